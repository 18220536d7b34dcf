//! External system integrations for Roster.
//!
//! - [`directory`] - account lookup (LDAP, JSON snapshot)
//! - [`spreadsheet`] - workbook export
//! - [`mail`] - notification delivery (SMTP, pickup folder)
//!
//! Each adapter sits behind a trait so the run orchestrator can be exercised
//! with in-memory fakes.

pub mod directory;
pub mod mail;
pub mod spreadsheet;
