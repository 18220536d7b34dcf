//! Result type alias for Roster

use super::errors::RosterError;

/// Result type alias for Roster operations
///
/// # Examples
///
/// ```
/// use roster::domain::result::Result;
/// use roster::domain::errors::RosterError;
///
/// fn failing_function() -> Result<()> {
///     Err(RosterError::Configuration("no scopes".to_string()))
/// }
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, RosterError>;
