//! Integration tests for configuration loading and validation
//!
//! Tests that modify environment variables hold ENV_MUTEX.

use roster::config::{
    load_config, load_input, DirectoryKind, MailSecurity, MailTransport,
};
use roster::core::report::TieBreak;
use roster::domain::{InputError, RosterError};
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use test_case::test_case;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn cleanup_env_vars() {
    std::env::remove_var("ROSTER_APPLICATION_LOG_LEVEL");
    std::env::remove_var("ROSTER_MAIL_SMTP_HOST");
    std::env::remove_var("ROSTER_MAIL_SMTP_PORT");
    std::env::remove_var("ROSTER_DIRECTORY_URL");
    std::env::remove_var("ROSTER_OUTPUT_LOG_FOLDER");
    std::env::remove_var("TEST_ROSTER_BIND_PASSWORD");
}

fn write_temp(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const COMPLETE: &str = r#"
[application]
name = "new-users-benelux"
log_level = "debug"

[directory]
kind = "ldap"
url = "ldaps://dc01.contoso.net:636"
bind_dn = "CN=svc-roster,OU=Service,DC=contoso,DC=net"
bind_password = "${TEST_ROSTER_BIND_PASSWORD}"
timeout_seconds = 20

[mail]
transport = "smtp"
smtp_host = "smtp.contoso.net"
smtp_port = 587
security = "starttls"
from = "Roster <roster@contoso.net>"
admins = ["it-ops@contoso.net", "backup@contoso.net"]

[output]
log_folder = "/var/lib/roster/log"

[report]
tie_break = "country"

[logging]
local_enabled = true
local_path = "/var/log/roster"
local_rotation = "hourly"
event_log_path = "/var/log/roster/events.jsonl"
"#;

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_ROSTER_BIND_PASSWORD", "s3cret");

    let file = write_temp(COMPLETE);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.name, "new-users-benelux");
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.directory.kind, DirectoryKind::Ldap);
    assert_eq!(config.directory.timeout_seconds, 20);
    let password: &str = config
        .directory
        .bind_password
        .as_ref()
        .unwrap()
        .expose_secret()
        .as_ref();
    assert_eq!(password, "s3cret");
    assert_eq!(config.mail.transport, MailTransport::Smtp);
    assert_eq!(config.mail.security, MailSecurity::StartTls);
    assert_eq!(config.mail.smtp_port, 587);
    assert_eq!(config.mail.admins.len(), 2);
    assert_eq!(config.report.tie_break, TieBreak::Country);
    assert_eq!(config.logging.local_rotation, "hourly");

    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_configuration_error() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();

    let file = write_temp(COMPLETE);
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, RosterError::Configuration(_)));
    assert!(err.to_string().contains("TEST_ROSTER_BIND_PASSWORD"));
}

#[test]
fn test_env_overrides() {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_ROSTER_BIND_PASSWORD", "s3cret");
    std::env::set_var("ROSTER_APPLICATION_LOG_LEVEL", "warn");
    std::env::set_var("ROSTER_MAIL_SMTP_HOST", "relay.contoso.net");
    std::env::set_var("ROSTER_MAIL_SMTP_PORT", "2525");
    std::env::set_var("ROSTER_OUTPUT_LOG_FOLDER", "/tmp/roster-logs");

    let file = write_temp(COMPLETE);
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.application.log_level, "warn");
    assert_eq!(config.mail.smtp_host.as_deref(), Some("relay.contoso.net"));
    assert_eq!(config.mail.smtp_port, 2525);
    assert_eq!(config.output.log_folder, "/tmp/roster-logs");

    cleanup_env_vars();
}

#[test_case("url = \"ldaps://dc01.contoso.net:636\"", "url = \"https://dc01.contoso.net\"", "ldap://" ; "non ldap url")]
#[test_case("admins = [\"it-ops@contoso.net\", \"backup@contoso.net\"]", "admins = []", "mail.admins" ; "no admins")]
#[test_case("from = \"Roster <roster@contoso.net>\"", "from = \"roster\"", "mail.from" ; "bad sender")]
#[test_case("local_rotation = \"hourly\"", "local_rotation = \"weekly\"", "local_rotation" ; "bad rotation")]
#[test_case("smtp_host = \"smtp.contoso.net\"", "", "mail.smtp_host" ; "missing smtp host")]
fn test_invalid_config(from: &str, to: &str, expected: &str) {
    let _lock = ENV_MUTEX.lock().unwrap();
    cleanup_env_vars();
    std::env::set_var("TEST_ROSTER_BIND_PASSWORD", "s3cret");

    let file = write_temp(&COMPLETE.replace(from, to));
    let err = load_config(file.path()).unwrap_err();

    cleanup_env_vars();
    assert!(
        err.to_string().contains(expected),
        "expected '{expected}' in '{err}'"
    );
}

#[test]
fn test_load_input_file() {
    let file = write_temp(
        r#"{
            "MailTo": ["hr@contoso.net", "payroll@contoso.net"],
            "OU": "OU=Users,OU=BEL,DC=contoso,DC=net",
            "Days": 7
        }"#,
    );

    let job = load_input(file.path(), &["it-ops@contoso.net".to_string()]).unwrap();
    assert_eq!(job.mail_to.len(), 2);
    assert_eq!(job.scopes.len(), 1);
    assert_eq!(job.days, 7);
    assert_eq!(job.admins, vec!["it-ops@contoso.net".to_string()]);
}

#[test_case(r#"{"OU": "OU=BEL", "Days": 7}"#, InputError::MissingMailTo ; "missing mail to")]
#[test_case(r#"{"MailTo": "hr@contoso.net", "Days": 7}"#, InputError::MissingScopes ; "missing scopes")]
#[test_case(r#"{"MailTo": "hr@contoso.net", "OU": "OU=BEL"}"#, InputError::MissingDays ; "missing days")]
#[test_case(r#"{"MailTo": "hr@contoso.net", "OU": "OU=BEL", "Days": "abc"}"#, InputError::DaysNotNumeric("abc".to_string()) ; "non numeric days")]
fn test_invalid_input_file(contents: &str, expected: InputError) {
    let file = write_temp(contents);
    let err = load_input(file.path(), &[]).unwrap_err();
    assert_eq!(err, expected);
}

#[test]
fn test_missing_input_file() {
    let err = load_input("/nonexistent/input.json", &[]).unwrap_err();
    assert!(matches!(err, InputError::NotFound(_)));
}
