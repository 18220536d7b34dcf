//! Logging and run telemetry
//!
//! - [`structured`] - tracing subscriber setup (console plus optional rotating
//!   JSON file)
//! - [`events`] - run-start, run-end and failure events, emitted on the
//!   `roster::events` target and optionally appended to a JSON-lines file
//!
//! # Example
//!
//! ```no_run
//! use roster::logging::init_logging;
//! use roster::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(count = 3, "Report built");
//! ```

pub mod events;
pub mod structured;

pub use events::{Event, EventKind, EventLog, Phase, RunEndGuard};
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log an error with the phase it interrupted
///
/// # Example
///
/// ```no_run
/// use roster::log_error_with_context;
/// use roster::domain::RosterError;
///
/// let error = RosterError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "setup");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = %$context,
            "Error occurred"
        );
    };
}
