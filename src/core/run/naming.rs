//! Log location and per-run file names
//!
//! Every artefact of one run shares a prefix:
//! `{folder}/{YYYY-MM-DD HHMMSS} ({Weekday}) - {job} - {suffix}`.

use crate::domain::{Result, RosterError};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const SPREADSHEET_SUFFIX: &str = "Accounts.xlsx";
pub const MAIL_COPY_SUFFIX: &str = "Mail.html";
pub const ERROR_COPY_SUFFIX: &str = "Error.html";

/// A writable folder plus the file prefix for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLocation {
    folder: PathBuf,
    prefix: String,
}

impl LogLocation {
    /// Creates the folder when missing and checks that it is writable
    ///
    /// # Errors
    ///
    /// [`RosterError::LogLocation`] when the folder cannot be created or a
    /// probe file cannot be written to it.
    pub fn prepare(folder: impl AsRef<Path>, job: &str, started: NaiveDateTime) -> Result<Self> {
        let folder = folder.as_ref();
        let location_error = |message: String| {
            RosterError::LogLocation(format!("'{}': {message}", folder.display()))
        };

        std::fs::create_dir_all(folder).map_err(|e| location_error(e.to_string()))?;

        let probe = folder.join(format!(".roster-probe-{}", Uuid::new_v4()));
        std::fs::write(&probe, b"")
            .map_err(|e| location_error(format!("not writable: {e}")))?;
        if let Err(e) = std::fs::remove_file(&probe) {
            tracing::warn!(path = %probe.display(), error = %e, "Failed to remove probe file");
        }

        let location = Self {
            folder: folder.to_path_buf(),
            prefix: prefix(job, started),
        };
        tracing::debug!(folder = %folder.display(), prefix = %location.prefix, "Log location ready");
        Ok(location)
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn file(&self, suffix: &str) -> PathBuf {
        self.folder.join(format!("{} - {suffix}", self.prefix))
    }

    pub fn spreadsheet(&self) -> PathBuf {
        self.file(SPREADSHEET_SUFFIX)
    }

    pub fn mail_copy(&self) -> PathBuf {
        self.file(MAIL_COPY_SUFFIX)
    }

    pub fn error_copy(&self) -> PathBuf {
        self.file(ERROR_COPY_SUFFIX)
    }
}

fn prefix(job: &str, started: NaiveDateTime) -> String {
    format!("{} - {job}", started.format("%Y-%m-%d %H%M%S (%A)"))
}
