//! Init command implementation
//!
//! Generates a sample `roster.toml` and, on request, a sample job input.

use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "roster.toml")]
    pub output: String,

    /// Also write a sample job input file to this path
    #[arg(long)]
    pub input: Option<String>,

    /// Include comments explaining every setting
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Roster configuration");
        println!();

        let mut targets = vec![self.output.as_str()];
        targets.extend(self.input.as_deref());
        for target in &targets {
            if Path::new(target).exists() && !self.force {
                println!("❌ File already exists: {target}");
                println!("   Use --force to overwrite");
                return Ok(2);
            }
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        if let Err(e) = fs::write(&self.output, config_content) {
            println!("❌ Failed to write configuration file");
            println!("   Error: {e}");
            return Ok(5);
        }
        println!("✅ Configuration file created: {}", self.output);

        if let Some(input) = &self.input {
            if let Err(e) = fs::write(input, Self::generate_input()) {
                println!("❌ Failed to write job input file");
                println!("   Error: {e}");
                return Ok(5);
            }
            println!("✅ Job input file created: {input}");
        }

        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your directory and mail settings", self.output);
        println!("  2. Set ROSTER_DIRECTORY_BIND_PASSWORD in the environment or a .env file");
        println!("  3. Validate: roster validate-config --input <job input>");
        println!("  4. Try it: roster run --input <job input> --dry-run");
        println!();
        Ok(0)
    }

    fn generate_minimal_config() -> String {
        r#"# Roster Configuration File

[application]
name = "new-users"
log_level = "info"

[directory]
kind = "ldap"
url = "ldaps://dc01.contoso.net"
bind_dn = "CN=svc-roster,OU=Service Accounts,DC=contoso,DC=net"
bind_password = "${ROSTER_DIRECTORY_BIND_PASSWORD}"
timeout_seconds = 30

[mail]
transport = "smtp"
smtp_host = "smtp.contoso.net"
smtp_port = 25
security = "none"
from = "roster@contoso.net"
admins = ["it-ops@contoso.net"]

[output]
log_folder = "/var/lib/roster/log"

[report]
tie_break = "first_seen"

[logging]
local_enabled = false
local_path = "/var/log/roster"
local_rotation = "daily"
"#
        .to_string()
    }

    fn generate_config_with_examples() -> String {
        r#"# Roster Configuration File
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any setting can also be overridden with ROSTER_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Job name, used in log file names, telemetry and failure subjects
name = "new-users"

# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Directory
# ============================================================================
[directory]
# "ldap" queries Active Directory, "json" reads a snapshot file
kind = "ldap"

# ldap:// or ldaps:// URL of a domain controller
url = "ldaps://dc01.contoso.net"

# Service account; leave both unset for an anonymous bind
bind_dn = "CN=svc-roster,OU=Service Accounts,DC=contoso,DC=net"
bind_password = "${ROSTER_DIRECTORY_BIND_PASSWORD}"

# Connect and search timeout in seconds
timeout_seconds = 30

# Snapshot file used when kind = "json"
# snapshot_path = "accounts.json"

# ============================================================================
# Mail
# ============================================================================
[mail]
# "smtp" sends through a relay, "pickup" writes .eml files to pickup_path
transport = "smtp"

smtp_host = "smtp.contoso.net"
smtp_port = 25

# none | starttls | tls
security = "none"

# Optional relay credentials (set both or neither)
# username = "svc-roster"
# password = "${ROSTER_MAIL_PASSWORD}"

from = "roster@contoso.net"

# Receive failure notifications and a bcc copy of every report
admins = ["it-ops@contoso.net"]

# Pickup folder, also used by `run --dry-run`
# pickup_path = "/var/lib/roster/pickup"

timeout_seconds = 30

# ============================================================================
# Output
# ============================================================================
[output]
# Spreadsheets and copies of sent messages are written here
log_folder = "/var/lib/roster/log"

# ============================================================================
# Report
# ============================================================================
[report]
# Order of countries with equal counts: first_seen | country
tie_break = "first_seen"

# ============================================================================
# Logging
# ============================================================================
[logging]
# Enable JSON file logging
local_enabled = false
local_path = "/var/log/roster"

# daily | hourly | never
local_rotation = "daily"

# Append run telemetry events as JSON lines
# event_log_path = "/var/log/roster/events.jsonl"
"#
        .to_string()
    }

    fn generate_input() -> String {
        r#"{
  "MailTo": ["hr@contoso.net"],
  "OU": [
    "OU=Users,OU=BEL,DC=contoso,DC=net",
    "OU=Users,OU=FRA,DC=contoso,DC=net"
  ],
  "Days": 7
}
"#
        .to_string()
    }
}
