// Roster - New directory accounts report
// Copyright (c) 2025 Roster Contributors
// Licensed under the MIT License

use roster::cli::{Cli, Commands};
use roster::config::{load_config, LoggingConfig, RosterConfig};
use roster::domain::Result;
use roster::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main]
async fn main() {
    // .env is optional
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // `run` loads roster.toml once, before logging, so file logging follows it;
    // a load failure is reported by the command
    let loaded = match &cli.command {
        Commands::Run(_) => Some(load_config(&cli.config)),
        _ => None,
    };
    let (config_level, logging_config) = match &loaded {
        Some(Ok(config)) => (
            Some(config.application.log_level.clone()),
            config.logging.clone(),
        ),
        _ => (None, LoggingConfig::default()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let logging_guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Roster - new directory accounts report"
    );

    let exit_code = match execute_command(&cli, loaded).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5
        }
    };

    // process::exit skips destructors
    drop(logging_guard);
    process::exit(exit_code);
}

async fn execute_command(cli: &Cli, loaded: Option<Result<RosterConfig>>) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Run(args) => match loaded {
            Some(loaded) => args.execute_loaded(&cli.config, loaded).await,
            None => args.execute(&cli.config).await,
        },
        Commands::ValidateConfig(args) => args.execute(&cli.config).await,
        Commands::Init(args) => args.execute().await,
    }
}
