//! Snapshot-file implementation of [`DirectoryQuery`]
//!
//! Reads a JSON array of [`AccountRecord`] and applies the same recency and
//! scope rules an LDAP search would. Used for offline runs and tests.

use super::traits::DirectoryQuery;
use crate::core::filter::{cutoff, select_recent};
use crate::domain::{AccountRecord, DirectoryError, Result, Scope};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// Directory backed by a JSON snapshot file
#[derive(Debug, Clone)]
pub struct JsonDirectory {
    path: PathBuf,
}

impl JsonDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the snapshot and selects records relative to `now`
    pub async fn query_at(
        &self,
        scopes: &[Scope],
        since_days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<AccountRecord>> {
        let snapshot_error = |message: String| DirectoryError::Snapshot {
            path: self.path.display().to_string(),
            message,
        };

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| snapshot_error(e.to_string()))?;
        let records: Vec<AccountRecord> =
            serde_json::from_str(&contents).map_err(|e| snapshot_error(e.to_string()))?;

        let total = records.len();
        let selected = select_recent(records, scopes, cutoff(now, since_days));
        tracing::debug!(
            path = %self.path.display(),
            total,
            selected = selected.len(),
            "Snapshot filtered"
        );
        Ok(selected)
    }
}

#[async_trait]
impl DirectoryQuery for JsonDirectory {
    async fn query(&self, scopes: &[Scope], since_days: u32) -> Result<Vec<AccountRecord>> {
        self.query_at(scopes, since_days, Utc::now()).await
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
