//! Excel workbook writer

use super::SpreadsheetExporter;
use crate::domain::{AccountRecord, Cell, Field, Result, SpreadsheetError, EXPORT_FIELDS};
use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook, Worksheet, XlsxError};
use std::path::{Path, PathBuf};

const SHEET_NAME: &str = "Accounts";

/// Writes [`EXPORT_FIELDS`] of every record to one worksheet
///
/// The header row is bold, frozen and carries an autofilter.
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    fields: Vec<Field>,
}

impl XlsxExporter {
    pub fn new() -> Self {
        Self {
            fields: EXPORT_FIELDS.to_vec(),
        }
    }

    /// Restricts the exported columns
    pub fn with_fields(mut self, fields: &[Field]) -> Self {
        self.fields = fields.to_vec();
        self
    }

    fn write_sheet(
        &self,
        sheet: &mut Worksheet,
        records: &[AccountRecord],
        text_fields: &[Field],
    ) -> std::result::Result<(), XlsxError> {
        let header = Format::new().set_bold();
        let text = Format::new().set_num_format("@");
        let date = Format::new().set_num_format("dd/mm/yyyy");
        let timestamp = Format::new().set_num_format("dd/mm/yyyy hh:mm");

        sheet.set_name(SHEET_NAME)?;
        for (col, field) in self.fields.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, field.header(), &header)?;
        }

        for (index, record) in records.iter().enumerate() {
            let row = index as u32 + 1;
            for (col, field) in self.fields.iter().enumerate() {
                let col = col as u16;
                match cell_value(*field, record, text_fields) {
                    CellValue::Empty => {}
                    CellValue::Text(value) => {
                        sheet.write_string_with_format(row, col, &value, &text)?;
                    }
                    CellValue::General(value) => {
                        sheet.write_string(row, col, &value)?;
                    }
                    CellValue::Number(number) => {
                        sheet.write_number(row, col, number)?;
                    }
                    CellValue::Date(value) => {
                        sheet.write_datetime_with_format(row, col, &excel_date(value)?, &date)?;
                    }
                    CellValue::Timestamp(value) => {
                        sheet.write_datetime_with_format(
                            row,
                            col,
                            &excel_timestamp(value)?,
                            &timestamp,
                        )?;
                    }
                    CellValue::Flag(value) => {
                        sheet.write_boolean(row, col, value)?;
                    }
                }
            }
        }

        if !self.fields.is_empty() {
            let last_col = self.fields.len() as u16 - 1;
            sheet.set_freeze_panes(1, 0)?;
            sheet.autofilter(0, 0, records.len() as u32, last_col)?;
        }
        sheet.autofit();
        Ok(())
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SpreadsheetExporter for XlsxExporter {
    fn export(
        &self,
        records: &[AccountRecord],
        path: &Path,
        text_fields: &[Field],
    ) -> Result<PathBuf> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        self.write_sheet(sheet, records, text_fields)
            .map_err(|e| SpreadsheetError::WriteFailed(e.to_string()))?;

        workbook
            .save(path)
            .map_err(|e| SpreadsheetError::SaveFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(
            path = %path.display(),
            rows = records.len(),
            "Spreadsheet exported"
        );
        Ok(path.to_path_buf())
    }
}

/// How one field of one record lands in the worksheet
#[derive(Debug, Clone, PartialEq)]
enum CellValue {
    Empty,
    /// String with the `@` (text) number format
    Text(String),
    General(String),
    Number(f64),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Flag(bool),
}

fn cell_value(field: Field, record: &AccountRecord, text_fields: &[Field]) -> CellValue {
    match field.cell(record) {
        Cell::Text(value) if text_fields.contains(&field) => CellValue::Text(value),
        Cell::Text(value) => match numeric_value(&value) {
            Some(number) => CellValue::Number(number),
            None if value.is_empty() => CellValue::Empty,
            None => CellValue::General(value),
        },
        Cell::Date(value) => CellValue::Date(value),
        Cell::Timestamp(value) => CellValue::Timestamp(value),
        Cell::Flag(value) => CellValue::Flag(value),
    }
}

/// Parses text that a spreadsheet user would read as a plain number
///
/// Leading zeros and `+` prefixes mark identifiers, not quantities.
fn numeric_value(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.starts_with('+') {
        return None;
    }
    let digits = trimmed.trim_start_matches('-');
    if digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.") {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn excel_date(date: NaiveDate) -> std::result::Result<ExcelDateTime, XlsxError> {
    ExcelDateTime::from_ymd(date.year() as _, date.month() as _, date.day() as _)
}

fn excel_timestamp(moment: DateTime<Utc>) -> std::result::Result<ExcelDateTime, XlsxError> {
    excel_date(moment.date_naive())?.and_hms(
        moment.hour() as _,
        moment.minute() as _,
        moment.second() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Expiration, TEXT_FIELDS};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn record(name: &str) -> AccountRecord {
        AccountRecord::new(name, Utc.with_ymd_and_hms(2026, 10, 14, 8, 30, 0).unwrap())
            .with_country("Belgium")
            .with_employee_id("000123")
            .with_expiration(Expiration::On(NaiveDate::from_ymd_opt(2027, 3, 31).unwrap()))
    }

    #[test]
    fn test_numeric_value() {
        assert_eq!(numeric_value("42"), Some(42.0));
        assert_eq!(numeric_value("-3.5"), Some(-3.5));
        assert_eq!(numeric_value("0"), Some(0.0));
        assert_eq!(numeric_value("0.25"), Some(0.25));
        assert_eq!(numeric_value("000123"), None);
        assert_eq!(numeric_value("+32 2 555 01 01"), None);
        assert_eq!(numeric_value("inf"), None);
        assert_eq!(numeric_value("Belgium"), None);
        assert_eq!(numeric_value(""), None);
    }

    #[test]
    fn test_text_fields_are_never_numbers() {
        let mut account = record("Jane");
        account.office_phone = "025550101".to_string();
        account.mobile_phone = "+32 470 55 01 01".to_string();
        account.pager = "4711".to_string();

        assert_eq!(
            cell_value(Field::EmployeeId, &account, &TEXT_FIELDS),
            CellValue::Text("000123".to_string())
        );
        assert_eq!(
            cell_value(Field::OfficePhone, &account, &TEXT_FIELDS),
            CellValue::Text("025550101".to_string())
        );
        assert_eq!(
            cell_value(Field::MobilePhone, &account, &TEXT_FIELDS),
            CellValue::Text("+32 470 55 01 01".to_string())
        );
        assert_eq!(
            cell_value(Field::Pager, &account, &TEXT_FIELDS),
            CellValue::Text("4711".to_string())
        );
    }

    #[test]
    fn test_numeric_text_outside_text_fields_becomes_number() {
        let mut account = record("Jane");
        account.pager = "4711".to_string();

        assert_eq!(cell_value(Field::Pager, &account, &[]), CellValue::Number(4711.0));
        assert_eq!(
            cell_value(Field::Country, &account, &TEXT_FIELDS),
            CellValue::General("Belgium".to_string())
        );
        assert_eq!(cell_value(Field::Fax, &account, &[]), CellValue::Empty);
        assert_eq!(
            cell_value(Field::Expiration, &account, &TEXT_FIELDS),
            CellValue::Date(NaiveDate::from_ymd_opt(2027, 3, 31).unwrap())
        );
    }

    #[test]
    fn test_export_writes_workbook() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("accounts.xlsx");

        let written = XlsxExporter::new()
            .export(&[record("Jane"), record("Luc")], &path, &TEXT_FIELDS)
            .unwrap();

        assert_eq!(written, path);
        let bytes = std::fs::read(&path).unwrap();
        // xlsx files are zip archives
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn test_export_to_missing_folder_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("accounts.xlsx");

        let err = XlsxExporter::new()
            .export(&[record("Jane")], &path, &TEXT_FIELDS)
            .unwrap_err();
        assert!(err.to_string().contains("accounts.xlsx"));
    }

    #[test]
    fn test_with_fields_limits_columns() {
        let exporter = XlsxExporter::new().with_fields(&[Field::DisplayName, Field::Country]);
        assert_eq!(exporter.fields.len(), 2);
    }
}
