//! Directory abstraction trait

use crate::domain::{AccountRecord, Result, Scope};
use async_trait::async_trait;

/// Source of directory accounts
///
/// Implementations own their connection, timeout and concurrency policy. An
/// implementation that spawns tasks must join or cancel all of them before
/// `query` returns, on success and on error.
#[async_trait]
pub trait DirectoryQuery: Send + Sync {
    /// Returns the accounts created in the last `since_days` days inside `scopes`
    ///
    /// An empty result is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::RosterError::Directory`] when the directory
    /// cannot be reached or a search fails.
    async fn query(&self, scopes: &[Scope], since_days: u32) -> Result<Vec<AccountRecord>>;

    /// Short description for logs (server URL or snapshot path)
    fn describe(&self) -> String;
}
