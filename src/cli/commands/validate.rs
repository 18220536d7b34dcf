//! Validate config command implementation
//!
//! Loads the runtime configuration (and a job input file when given) and
//! prints a summary without contacting the directory or the mail server.

use crate::config::{load_config, load_input, DirectoryKind, MailTransport};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also validate this job input file
    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates every section
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Job: {}", config.application.name);
        println!("  Log Level: {}", config.application.log_level);
        match config.directory.kind {
            DirectoryKind::Ldap => println!(
                "  Directory: LDAP {}",
                config.directory.url.as_deref().unwrap_or("-")
            ),
            DirectoryKind::Json => println!(
                "  Directory: snapshot {}",
                config.directory.snapshot_path.as_deref().unwrap_or("-")
            ),
        }
        match config.mail.transport {
            MailTransport::Smtp => println!(
                "  Mail: SMTP {}:{} ({:?})",
                config.mail.smtp_host.as_deref().unwrap_or("-"),
                config.mail.smtp_port,
                config.mail.security
            ),
            MailTransport::Pickup => println!(
                "  Mail: pickup folder {}",
                config.mail.pickup_path.as_deref().unwrap_or("-")
            ),
        }
        println!("  From: {}", config.mail.from);
        println!("  Admins: {}", config.mail.admins.join(", "));
        println!("  Log Folder: {}", config.output.log_folder);
        println!();

        let Some(input) = &self.input else {
            return Ok(0);
        };

        println!("🔍 Validating job input: {}", input.display());
        match load_input(input, &config.mail.admins) {
            Ok(job) => {
                println!("✅ Job input is valid");
                println!("  Recipients: {}", job.mail_to.join(", "));
                for scope in &job.scopes {
                    println!("  Scope: {scope}");
                }
                println!("  Days: {}", job.days);
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Job input validation failed");
                println!("   Error: {e}");
                println!();
                Ok(2)
            }
        }
    }
}
