//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Roster using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Roster - new directory accounts report
#[derive(Parser, Debug)]
#[command(name = "roster")]
#[command(version, about, long_about = None)]
#[command(author = "Roster Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "roster.toml", env = "ROSTER_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ROSTER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Query the directory and mail the new-accounts report
    Run(commands::run::RunArgs),

    /// Validate configuration file (and optionally a job input file)
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
