//! Recency filtering
//!
//! Both directory implementations derive their cut-off from the same helper so
//! "created in the last N days" means the same thing for an LDAP search and a
//! snapshot file.

use crate::domain::{AccountRecord, Scope};
use chrono::{DateTime, TimeDelta, Utc};

/// Oldest creation time still counted as new
///
/// A window reaching past the earliest representable time saturates there.
pub fn cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Keeps records created at or after the cut-off and located in one of the scopes
///
/// Records without a distinguished name cannot be placed and are kept only
/// when `scopes` is empty.
pub fn select_recent(
    records: Vec<AccountRecord>,
    scopes: &[Scope],
    since: DateTime<Utc>,
) -> Vec<AccountRecord> {
    records
        .into_iter()
        .filter(|r| r.created >= since)
        .filter(|r| scopes.is_empty() || scopes.iter().any(|s| s.contains(&r.distinguished_name)))
        .collect()
}
