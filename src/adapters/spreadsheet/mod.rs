//! Spreadsheet export
//!
//! [`SpreadsheetExporter`] writes account records to a file and returns its
//! path. [`XlsxExporter`] is the Excel implementation.

pub mod xlsx;

pub use xlsx::XlsxExporter;

use crate::domain::{AccountRecord, Field, Result};
use std::path::{Path, PathBuf};

/// Writes records to a spreadsheet file
pub trait SpreadsheetExporter: Send + Sync {
    /// Exports `records` to `path`
    ///
    /// Values of `text_fields` are always written as text, other values that
    /// look numeric are written as numbers.
    ///
    /// # Errors
    ///
    /// Returns [`crate::domain::RosterError::Spreadsheet`] if the workbook
    /// cannot be written or saved.
    fn export(&self, records: &[AccountRecord], path: &Path, text_fields: &[Field])
        -> Result<PathBuf>;
}
