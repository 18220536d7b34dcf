//! Configuration schema types
//!
//! This module defines the runtime configuration structure for Roster. The job
//! parameters (recipients, scopes, day threshold) live in a separate input
//! file, see [`crate::config::input`].

use crate::config::SecretString;
use crate::core::report::TieBreak;
use lettre::message::Mailbox;
use lettre::Address;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Main Roster configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Directory connection
    pub directory: DirectoryConfig,

    /// Mail delivery
    pub mail: MailConfig,

    /// Where spreadsheets and message copies are written
    pub output: OutputConfig,

    /// Report rendering options
    #[serde(default)]
    pub report: ReportSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RosterConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.directory.validate()?;
        self.mail.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Job name, used in file names and telemetry
    #[serde(default = "default_name")]
    pub name: String,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("application.name cannot be empty".to_string());
        }

        if self
            .name
            .chars()
            .any(|c| matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        {
            return Err(format!(
                "application.name '{}' contains characters not allowed in file names",
                self.name
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

/// Directory implementation selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryKind {
    /// LDAP / Active Directory server
    #[default]
    Ldap,
    /// JSON snapshot file
    Json,
}

/// Directory connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Which directory implementation to use
    #[serde(default)]
    pub kind: DirectoryKind,

    /// LDAP URL, e.g. `ldaps://dc01.contoso.net:636`
    #[serde(default)]
    pub url: Option<String>,

    /// Bind DN or UPN (anonymous bind when absent)
    #[serde(default)]
    pub bind_dn: Option<String>,

    /// Bind password
    #[serde(default)]
    pub bind_password: Option<SecretString>,

    /// Connection and operation timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// JSON snapshot path (kind = "json")
    #[serde(default)]
    pub snapshot_path: Option<String>,
}

impl DirectoryConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_seconds == 0 {
            return Err("directory.timeout_seconds must be > 0".to_string());
        }

        match self.kind {
            DirectoryKind::Ldap => {
                let raw = self
                    .url
                    .as_deref()
                    .filter(|u| !u.trim().is_empty())
                    .ok_or_else(|| {
                        "directory.url is required when directory.kind = 'ldap'".to_string()
                    })?;
                let url = url::Url::parse(raw)
                    .map_err(|e| format!("directory.url '{raw}' is not a valid URL: {e}"))?;
                if !matches!(url.scheme(), "ldap" | "ldaps") {
                    return Err(format!(
                        "directory.url must start with ldap:// or ldaps://, got '{raw}'"
                    ));
                }

                let has_dn = self.bind_dn.as_ref().is_some_and(|d| !d.is_empty());
                let has_password = self
                    .bind_password
                    .as_ref()
                    .is_some_and(|p| !p.expose_secret().is_empty());
                if has_dn != has_password {
                    return Err(
                        "directory.bind_dn and directory.bind_password must be set together"
                            .to_string(),
                    );
                }
            }
            DirectoryKind::Json => {
                if self
                    .snapshot_path
                    .as_deref()
                    .map_or(true, |p| p.trim().is_empty())
                {
                    return Err(
                        "directory.snapshot_path is required when directory.kind = 'json'"
                            .to_string(),
                    );
                }
            }
        }
        Ok(())
    }
}

/// Mail transport selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    /// Deliver through an SMTP relay
    #[default]
    Smtp,
    /// Write messages to a pickup folder
    Pickup,
}

/// SMTP connection security
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailSecurity {
    /// Plain connection (internal relays)
    #[default]
    None,
    /// Upgrade with STARTTLS
    StartTls,
    /// Implicit TLS
    Tls,
}

/// Mail delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Transport used for delivery
    #[serde(default)]
    pub transport: MailTransport,

    /// SMTP relay host
    #[serde(default)]
    pub smtp_host: Option<String>,

    /// SMTP relay port
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Connection security
    #[serde(default)]
    pub security: MailSecurity,

    /// SMTP username (unauthenticated relay when absent)
    #[serde(default)]
    pub username: Option<String>,

    /// SMTP password
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Sender address
    pub from: String,

    /// Admin addresses: bcc on reports, sole recipients of failure notifications
    pub admins: Vec<String>,

    /// Pickup folder (transport = "pickup")
    #[serde(default)]
    pub pickup_path: Option<String>,

    /// SMTP timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl MailConfig {
    fn validate(&self) -> Result<(), String> {
        self.from
            .parse::<Mailbox>()
            .map_err(|e| format!("mail.from '{}' is not a valid address: {e}", self.from))?;

        if self.admins.is_empty() {
            return Err("mail.admins cannot be empty".to_string());
        }
        for admin in &self.admins {
            admin
                .parse::<Address>()
                .map_err(|e| format!("mail.admins entry '{admin}' is not a valid address: {e}"))?;
        }

        match self.transport {
            MailTransport::Smtp => {
                if self
                    .smtp_host
                    .as_deref()
                    .map_or(true, |h| h.trim().is_empty())
                {
                    return Err(
                        "mail.smtp_host is required when mail.transport = 'smtp'".to_string()
                    );
                }
                if self.smtp_port == 0 {
                    return Err("mail.smtp_port must be > 0".to_string());
                }
                if self.timeout_seconds == 0 {
                    return Err("mail.timeout_seconds must be > 0".to_string());
                }
            }
            MailTransport::Pickup => {
                if self
                    .pickup_path
                    .as_deref()
                    .map_or(true, |p| p.trim().is_empty())
                {
                    return Err(
                        "mail.pickup_path is required when mail.transport = 'pickup'".to_string()
                    );
                }
            }
        }

        if self.username.is_some() != self.password.is_some() {
            return Err("mail.username and mail.password must be set together".to_string());
        }

        Ok(())
    }
}

/// Output location configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Folder receiving the spreadsheet and copies of sent messages
    pub log_folder: String,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.log_folder.trim().is_empty() {
            return Err("output.log_folder cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Report rendering options
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportSettings {
    /// Ordering of countries with equal counts
    #[serde(default)]
    pub tie_break: TieBreak,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,

    /// Operational event log (JSON lines); events only go to tracing when absent
    #[serde(default)]
    pub event_log_path: Option<String>,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
            event_log_path: None,
        }
    }
}

fn default_name() -> String {
    "roster".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_smtp_port() -> u16 {
    25
}

fn default_local_path() -> String {
    "/var/log/roster".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
