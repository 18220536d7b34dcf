//! Configuration management for Roster.
//!
//! Two sources feed a run:
//!
//! - the **runtime configuration** (`roster.toml`, [`RosterConfig`]): directory
//!   connection, mail delivery, output folder and logging. Loaded by
//!   [`load_config`] with `${VAR}` substitution and `ROSTER_*` overrides.
//! - the **job input** (JSON, [`ReportConfig`]): recipients, scopes and the
//!   day threshold. Loaded by [`load_input`] with per-property validation.
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! name = "new-users"
//! log_level = "info"
//!
//! [directory]
//! kind = "ldap"
//! url = "ldaps://dc01.contoso.net:636"
//! bind_dn = "svc-roster@contoso.net"
//! bind_password = "${ROSTER_BIND_PASSWORD}"
//!
//! [mail]
//! smtp_host = "smtp.contoso.net"
//! from = "roster@contoso.net"
//! admins = ["ops@contoso.net"]
//!
//! [output]
//! log_folder = "/var/log/roster/new-users"
//! ```

pub mod input;
pub mod loader;
pub mod schema;
pub mod secret;

pub use input::{load_input, parse_input, ReportConfig, MAX_DAYS};
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DirectoryConfig, DirectoryKind, LoggingConfig, MailConfig, MailSecurity,
    MailTransport, OutputConfig, ReportSettings, RosterConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
