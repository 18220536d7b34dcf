//! Core business logic for Roster.
//!
//! # Modules
//!
//! - [`filter`] - recency and scope selection shared by directory backends
//! - [`report`] - report building and HTML rendering (pure)
//! - [`run`] - setup and run phases, failure notification, telemetry
//!
//! # Workflow
//!
//! 1. **Setup**: prepare the log folder, load and validate the job input
//! 2. **Query**: fetch accounts created in the last N days from each scope
//! 3. **Build**: subject, per-country counts, detail table
//! 4. **Export**: write the spreadsheet when at least one account was found
//! 5. **Send**: mail recipients (bcc admins) and keep a copy of the HTML
//!
//! Any failure sends a high-priority notification to the admins instead.

pub mod filter;
pub mod report;
pub mod run;
