//! Report building and rendering
//!
//! - [`build_report`] turns directory records into a [`Report`]
//! - [`render_html`] turns a [`Report`] into the notification body
//!
//! # Example
//!
//! ```rust
//! use roster::core::report::{build_report, render_html};
//! use roster::domain::AccountRecord;
//! use chrono::Utc;
//!
//! let records = vec![
//!     AccountRecord::new("Jane Doe", Utc::now()).with_country("Belgium"),
//!     AccountRecord::new("Luc Martin", Utc::now()).with_country("France"),
//! ];
//! let report = build_report(&records, 7);
//! assert_eq!(report.subject, "2 new users created in the last 7 days");
//! let html = render_html(&report);
//! assert!(html.contains("Belgium"));
//! ```

pub mod builder;
pub mod html;

pub use builder::{
    build_report, build_report_with, CountryCount, DetailRow, Report, TieBreak, UNKNOWN_COUNTRY,
};
pub use html::{escape_html, render_failure_html, render_html};
