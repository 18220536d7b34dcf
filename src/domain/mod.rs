//! Domain models and types for Roster.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`Scope`])
//! - **Directory snapshot** ([`AccountRecord`], [`Expiration`])
//! - **Field catalogue** ([`Field`], [`Cell`]) with the fixed column sets
//! - **Error types** ([`RosterError`], [`InputError`], [`DirectoryError`],
//!   [`SpreadsheetError`], [`MailError`])
//! - **Result type alias** ([`Result`])
//!
//! # Example
//!
//! ```rust
//! use roster::domain::{AccountRecord, Expiration};
//! use chrono::{NaiveDate, Utc};
//!
//! let record = AccountRecord::new("Jane Doe", Utc::now())
//!     .with_country("Belgium")
//!     .with_expiration(Expiration::On(NaiveDate::from_ymd_opt(2027, 1, 31).unwrap()));
//! assert_eq!(record.expiration.to_string(), "31/01/2027");
//! ```

pub mod account;
pub mod errors;
pub mod fields;
pub mod ids;
pub mod result;

pub use account::{AccountRecord, Expiration};
pub use errors::{DirectoryError, InputError, MailError, RosterError, SpreadsheetError};
pub use fields::{Cell, Field, DETAIL_FIELDS, EXPORT_FIELDS, TEXT_FIELDS};
pub use ids::Scope;
pub use result::Result;
