//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{DirectoryKind, MailTransport, RosterConfig};
use super::secret_string;
use crate::domain::errors::RosterError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into RosterConfig
/// 4. Applies environment variable overrides (ROSTER_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`RosterError::Configuration`] if the file is missing or unreadable,
/// a referenced environment variable is unset, TOML parsing fails, or
/// validation fails.
///
/// # Examples
///
/// ```no_run
/// use roster::config::loader::load_config;
///
/// let config = load_config("roster.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<RosterConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(RosterError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        RosterError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: RosterConfig = toml::from_str(&contents)
        .map_err(|e| RosterError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        RosterError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("environment variable pattern is valid")
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&format!("${{{var_name}}}"), &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(RosterError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the ROSTER_* prefix
///
/// Environment variables follow the pattern ROSTER_<SECTION>_<KEY>, for
/// example ROSTER_DIRECTORY_URL or ROSTER_MAIL_SMTP_HOST.
fn apply_env_overrides(config: &mut RosterConfig) {
    if let Ok(val) = std::env::var("ROSTER_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    if let Ok(val) = std::env::var("ROSTER_DIRECTORY_KIND") {
        match val.to_lowercase().as_str() {
            "ldap" => config.directory.kind = DirectoryKind::Ldap,
            "json" => config.directory.kind = DirectoryKind::Json,
            other => tracing::warn!(value = %other, "Ignoring unknown ROSTER_DIRECTORY_KIND"),
        }
    }
    if let Ok(val) = std::env::var("ROSTER_DIRECTORY_URL") {
        config.directory.url = Some(val);
    }
    if let Ok(val) = std::env::var("ROSTER_DIRECTORY_BIND_DN") {
        config.directory.bind_dn = Some(val);
    }
    if let Ok(val) = std::env::var("ROSTER_DIRECTORY_BIND_PASSWORD") {
        config.directory.bind_password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("ROSTER_DIRECTORY_SNAPSHOT_PATH") {
        config.directory.snapshot_path = Some(val);
    }

    if let Ok(val) = std::env::var("ROSTER_MAIL_TRANSPORT") {
        match val.to_lowercase().as_str() {
            "smtp" => config.mail.transport = MailTransport::Smtp,
            "pickup" => config.mail.transport = MailTransport::Pickup,
            other => tracing::warn!(value = %other, "Ignoring unknown ROSTER_MAIL_TRANSPORT"),
        }
    }
    if let Ok(val) = std::env::var("ROSTER_MAIL_SMTP_HOST") {
        config.mail.smtp_host = Some(val);
    }
    if let Ok(val) = std::env::var("ROSTER_MAIL_SMTP_PORT") {
        if let Ok(port) = val.parse() {
            config.mail.smtp_port = port;
        }
    }
    if let Ok(val) = std::env::var("ROSTER_MAIL_USERNAME") {
        config.mail.username = Some(val);
    }
    if let Ok(val) = std::env::var("ROSTER_MAIL_PASSWORD") {
        config.mail.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("ROSTER_MAIL_PICKUP_PATH") {
        config.mail.pickup_path = Some(val);
    }

    if let Ok(val) = std::env::var("ROSTER_OUTPUT_LOG_FOLDER") {
        config.output.log_folder = val;
    }

    if let Ok(val) = std::env::var("ROSTER_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("ROSTER_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("ROSTER_LOGGING_EVENT_LOG_PATH") {
        config.logging.event_log_path = Some(val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID: &str = r#"
[application]
name = "new-users"

[directory]
kind = "json"
snapshot_path = "users.json"

[mail]
transport = "pickup"
pickup_path = "/tmp/pickup"
from = "roster@contoso.net"
admins = ["ops@contoso.net"]

[output]
log_folder = "/tmp/roster"
"#;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("ROSTER_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${ROSTER_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("ROSTER_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("ROSTER_LOADER_MISSING_VAR");
        let input = "password = \"${ROSTER_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("ROSTER_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("ROSTER_LOADER_COMMENTED");
        let input = "# password = \"${ROSTER_LOADER_COMMENTED}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent-roster.toml");
        assert!(matches!(result, Err(RosterError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(VALID.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.name, "new-users");
        assert_eq!(config.directory.kind, DirectoryKind::Json);
        assert_eq!(config.mail.transport, MailTransport::Pickup);
        assert_eq!(config.output.log_folder, "/tmp/roster");
        assert_eq!(config.mail.smtp_port, 25);
    }

    #[test]
    fn test_load_config_invalid_reports_validation() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(VALID.replace("admins = [\"ops@contoso.net\"]", "admins = []").as_bytes())
            .unwrap();
        temp_file.flush().unwrap();

        let err = load_config(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("mail.admins"));
    }
}
