//! Run command implementation
//!
//! Wires the configured directory, spreadsheet exporter and mail dispatcher
//! into a [`ReportJob`] and executes it once.

use crate::adapters::directory::create_directory;
use crate::adapters::mail::create_dispatcher;
use crate::adapters::spreadsheet::XlsxExporter;
use crate::config::{load_config, RosterConfig};
use crate::core::run::{ReportJob, EXIT_SETUP_FAILURE};
use crate::domain::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Job input file (MailTo, OU, Days)
    #[arg(short, long, env = "ROSTER_INPUT")]
    pub input: PathBuf,

    /// Write messages to the pickup folder instead of sending them
    #[arg(long)]
    pub dry_run: bool,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        self.execute_loaded(config_path, load_config(config_path)).await
    }

    /// Execute with the outcome of loading `config_path`
    pub async fn execute_loaded(
        &self,
        config_path: &str,
        loaded: Result<RosterConfig>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, input = %self.input.display(), "Starting run command");

        let config = match loaded {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Configuration could not be loaded");
                eprintln!("❌ Configuration error: {e}");
                return Ok(EXIT_SETUP_FAILURE);
            }
        };

        let directory = match create_directory(&config.directory) {
            Ok(directory) => directory,
            Err(e) => {
                eprintln!("❌ Directory setup failed: {e}");
                return Ok(EXIT_SETUP_FAILURE);
            }
        };
        let dispatcher = match create_dispatcher(&config, self.dry_run) {
            Ok(dispatcher) => dispatcher,
            Err(e) => {
                eprintln!("❌ Mail setup failed: {e}");
                return Ok(EXIT_SETUP_FAILURE);
            }
        };

        if self.dry_run {
            println!("🧪 Dry run: messages are written to the pickup folder, not sent");
        }
        println!("📋 Running job '{}'", config.application.name);

        let job = ReportJob::new(config, directory, Arc::new(XlsxExporter::new()), dispatcher);
        let outcome = job.execute(&self.input).await;

        if outcome.is_success() {
            if let Some(subject) = &outcome.subject {
                println!("✅ {subject}");
            }
            if let Some(path) = &outcome.attachment {
                println!("   Spreadsheet: {}", path.display());
            }
        } else {
            println!(
                "❌ Job failed (exit code {}), administrators have been notified",
                outcome.exit_code
            );
        }

        Ok(outcome.exit_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RosterError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_config_is_setup_failure() {
        let args = RunArgs {
            input: PathBuf::from("input.json"),
            dry_run: true,
        };
        let code = args.execute("/nonexistent/roster.toml").await.unwrap();
        assert_eq!(code, EXIT_SETUP_FAILURE);
    }

    #[tokio::test]
    async fn test_preloaded_config_error_is_setup_failure() {
        let args = RunArgs {
            input: PathBuf::from("input.json"),
            dry_run: false,
        };
        let loaded = Err(RosterError::Configuration(
            "Missing required environment variables: SMTP_PASSWORD".to_string(),
        ));
        let code = args.execute_loaded("roster.toml", loaded).await.unwrap();
        assert_eq!(code, EXIT_SETUP_FAILURE);
    }

    #[tokio::test]
    async fn test_dry_run_with_snapshot_directory() {
        let dir = TempDir::new().unwrap();
        let snapshot = dir.path().join("accounts.json");
        std::fs::write(&snapshot, "[]").unwrap();
        let input = dir.path().join("input.json");
        std::fs::write(
            &input,
            r#"{"MailTo": "hr@contoso.net", "OU": "OU=BEL,DC=contoso,DC=net", "Days": 30}"#,
        )
        .unwrap();

        let config = dir.path().join("roster.toml");
        std::fs::write(
            &config,
            format!(
                r#"
[directory]
kind = "json"
snapshot_path = "{}"

[mail]
from = "roster@contoso.net"
smtp_host = "smtp.contoso.net"
admins = ["admin@contoso.net"]
pickup_path = "{}"

[output]
log_folder = "{}"
"#,
                snapshot.display(),
                dir.path().join("pickup").display(),
                dir.path().join("logs").display()
            ),
        )
        .unwrap();

        let args = RunArgs {
            input,
            dry_run: true,
        };
        let code = args.execute(&config.to_string_lossy()).await.unwrap();
        assert_eq!(code, 0);
        assert_eq!(std::fs::read_dir(dir.path().join("pickup")).unwrap().count(), 1);
    }
}
