// Roster - New directory accounts report
// Copyright (c) 2025 Roster Contributors
// Licensed under the MIT License

//! # Roster - new directory accounts report
//!
//! Roster is a scheduled job that finds the user accounts created in a
//! directory during the last N days, summarises them per country, exports
//! them to a spreadsheet and mails the report with the spreadsheet attached.
//! Failures are mailed to administrators instead.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Report building, HTML rendering and run orchestration
//! - [`adapters`] - Directory (LDAP, JSON snapshot), spreadsheet and mail
//! - [`domain`] - Account records, field catalogue, errors
//! - [`config`] - Runtime configuration and job input
//! - [`logging`] - Structured logging and run telemetry
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roster::adapters::directory::create_directory;
//! use roster::adapters::mail::create_dispatcher;
//! use roster::adapters::spreadsheet::XlsxExporter;
//! use roster::config::load_config;
//! use roster::core::run::ReportJob;
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("roster.toml")?;
//!     let directory = create_directory(&config.directory)?;
//!     let dispatcher = create_dispatcher(&config, false)?;
//!
//!     let job = ReportJob::new(config, directory, Arc::new(XlsxExporter::new()), dispatcher);
//!     let outcome = job.execute(Path::new("input.json")).await;
//!     std::process::exit(outcome.exit_code);
//! }
//! ```
//!
//! ## Report
//!
//! The report itself is a pure function of the records and the day threshold:
//!
//! ```rust
//! use roster::core::report::build_report;
//! use roster::domain::AccountRecord;
//! use chrono::Utc;
//!
//! let records = vec![
//!     AccountRecord::new("Jane Doe", Utc::now()).with_country("Belgium"),
//!     AccountRecord::new("Jan Peeters", Utc::now()).with_country("Belgium"),
//!     AccountRecord::new("Luc Martin", Utc::now()).with_country("France"),
//! ];
//! let report = build_report(&records, 7);
//! assert_eq!(report.subject, "3 new users created in the last 7 days");
//! assert_eq!(report.countries[0].country, "Belgium");
//! assert_eq!(report.countries[0].count, 2);
//! ```
//!
//! ## Error Handling
//!
//! Library code returns [`domain::RosterError`]; `anyhow` is used only by the
//! CLI commands.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
