//! Domain error types
//!
//! This module defines the error hierarchy for Roster.
//! Collaborator errors are mapped into domain enums so third-party types
//! (LDAP, SMTP, spreadsheet writer) never leak through the public API.

use thiserror::Error;

/// Main Roster error type
#[derive(Debug, Error)]
pub enum RosterError {
    /// Runtime configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Job input errors
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// Directory query errors
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Spreadsheet export errors
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] SpreadsheetError),

    /// Mail errors
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// Log location errors
    #[error("Log location error: {0}")]
    LogLocation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

/// Job input errors
///
/// Each variant names the offending property so the failure notification
/// tells an operator exactly what to fix in the input file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// Input file does not exist
    #[error("Input file '{0}' not found")]
    NotFound(String),

    /// Input file could not be read
    #[error("Input file '{path}' could not be read: {message}")]
    Unreadable { path: String, message: String },

    /// Input file is not a JSON object
    #[error("Input file '{path}' is not a valid JSON object: {message}")]
    InvalidFormat { path: String, message: String },

    /// `MailTo` is missing or empty
    #[error("Property 'MailTo' not found or empty")]
    MissingMailTo,

    /// An address in `MailTo` is not a valid mailbox
    #[error("Property 'MailTo' contains an invalid address '{0}'")]
    InvalidMailTo(String),

    /// `OU` is missing or empty
    #[error("Property 'OU' not found or empty")]
    MissingScopes,

    /// `Days` is missing
    #[error("Property 'Days' not found")]
    MissingDays,

    /// `Days` is present but not a number
    #[error("Property 'Days' must be a number, found '{0}'")]
    DaysNotNumeric(String),

    /// `Days` is a number but not a positive integer
    #[error("Property 'Days' must be a positive whole number, found '{0}'")]
    DaysNotPositive(String),

    /// `Days` reaches further back than the directory can be searched
    #[error("Property 'Days' must be at most {max}, found '{found}'")]
    DaysTooLarge { found: String, max: u32 },
}

/// Directory-specific errors
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// Failed to connect to the directory server
    #[error("Failed to connect to directory server: {0}")]
    ConnectionFailed(String),

    /// Bind (authentication) was rejected
    #[error("Bind failed: {0}")]
    BindFailed(String),

    /// Search failed
    #[error("Search in '{scope}' failed: {message}")]
    SearchFailed { scope: String, message: String },

    /// Snapshot file could not be read or parsed
    #[error("Snapshot '{path}' unusable: {message}")]
    Snapshot { path: String, message: String },

    /// A search task panicked or was cancelled
    #[error("Search task aborted: {0}")]
    TaskAborted(String),

    /// Entry could not be decoded
    #[error("Invalid entry '{dn}': {message}")]
    InvalidEntry { dn: String, message: String },
}

/// Spreadsheet export errors
#[derive(Debug, Error)]
pub enum SpreadsheetError {
    /// Writing a cell or sheet property failed
    #[error("Failed to write worksheet: {0}")]
    WriteFailed(String),

    /// Saving the workbook failed
    #[error("Failed to save workbook '{path}': {message}")]
    SaveFailed { path: String, message: String },
}

/// Mail errors
#[derive(Debug, Error)]
pub enum MailError {
    /// Neither `to` nor `bcc` carries an address
    #[error("Notification has no recipients")]
    NoRecipients,

    /// Address could not be parsed
    #[error("Invalid address '{address}': {message}")]
    InvalidAddress { address: String, message: String },

    /// Message could not be assembled
    #[error("Failed to build message: {0}")]
    BuildFailed(String),

    /// Attachment could not be read
    #[error("Failed to read attachment '{path}': {message}")]
    Attachment { path: String, message: String },

    /// Transport rejected or failed to deliver the message
    #[error("Failed to send message: {0}")]
    SendFailed(String),

    /// Copy of the sent message could not be stored
    #[error("Failed to save message copy '{path}': {message}")]
    SaveFailed { path: String, message: String },
}

impl From<std::io::Error> for RosterError {
    fn from(err: std::io::Error) -> Self {
        RosterError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for RosterError {
    fn from(err: serde_json::Error) -> Self {
        RosterError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for RosterError {
    fn from(err: toml::de::Error) -> Self {
        RosterError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_error_display() {
        let err = RosterError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_input_errors_name_the_property() {
        assert!(InputError::MissingMailTo.to_string().contains("MailTo"));
        assert!(InputError::MissingScopes.to_string().contains("OU"));
        assert!(InputError::MissingDays.to_string().contains("Days"));
        assert!(InputError::DaysNotNumeric("abc".into())
            .to_string()
            .contains("abc"));
        assert_ne!(
            InputError::MissingDays.to_string(),
            InputError::DaysNotNumeric("x".into()).to_string()
        );
    }

    #[test]
    fn test_directory_error_conversion() {
        let dir_err = DirectoryError::BindFailed("invalid credentials".to_string());
        let err: RosterError = dir_err.into();
        assert!(matches!(err, RosterError::Directory(_)));
        assert!(err.to_string().contains("invalid credentials"));
    }

    #[test]
    fn test_mail_error_conversion() {
        let err: RosterError = MailError::NoRecipients.into();
        assert!(matches!(err, RosterError::Mail(MailError::NoRecipients)));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: RosterError = io_err.into();
        assert!(matches!(err, RosterError::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: RosterError = toml_err.into();
        assert!(matches!(err, RosterError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
