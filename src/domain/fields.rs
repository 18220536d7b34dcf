//! Static field catalogue for [`AccountRecord`]
//!
//! Every column the report or the spreadsheet shows is a [`Field`] variant with
//! a fixed header and accessor, so projections are checked at compile time
//! instead of selecting attributes by name.

use super::account::{AccountRecord, Expiration};
use chrono::{DateTime, NaiveDate, Utc};

/// A reportable attribute of an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    DisplayName,
    LogonName,
    Title,
    Department,
    Company,
    Office,
    Manager,
    AccountType,
    Country,
    Description,
    EmployeeId,
    OfficePhone,
    MobilePhone,
    IpPhone,
    HomePhone,
    Fax,
    Pager,
    Created,
    Expiration,
    Enabled,
    DistinguishedName,
}

/// Columns of the HTML detail table, in display order
pub const DETAIL_FIELDS: [Field; 6] = [
    Field::DisplayName,
    Field::Manager,
    Field::Company,
    Field::AccountType,
    Field::Country,
    Field::Expiration,
];

/// Columns of the spreadsheet, in display order
pub const EXPORT_FIELDS: [Field; 21] = [
    Field::DisplayName,
    Field::LogonName,
    Field::Title,
    Field::Department,
    Field::Company,
    Field::Office,
    Field::Manager,
    Field::AccountType,
    Field::Country,
    Field::EmployeeId,
    Field::OfficePhone,
    Field::MobilePhone,
    Field::IpPhone,
    Field::HomePhone,
    Field::Fax,
    Field::Pager,
    Field::Created,
    Field::Expiration,
    Field::Enabled,
    Field::Description,
    Field::DistinguishedName,
];

/// Fields written as text so spreadsheets keep leading zeros and `+` prefixes
pub const TEXT_FIELDS: [Field; 7] = [
    Field::EmployeeId,
    Field::OfficePhone,
    Field::MobilePhone,
    Field::IpPhone,
    Field::HomePhone,
    Field::Fax,
    Field::Pager,
];

/// Typed value of one field for one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Date(NaiveDate),
    Timestamp(DateTime<Utc>),
    Flag(bool),
}

impl Cell {
    /// Human-readable rendering used in the HTML report
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Date(d) => d.format("%d/%m/%Y").to_string(),
            Cell::Timestamp(t) => t.format("%d/%m/%Y %H:%M").to_string(),
            Cell::Flag(true) => "Yes".to_string(),
            Cell::Flag(false) => "No".to_string(),
        }
    }
}

impl Field {
    /// Column header
    pub fn header(self) -> &'static str {
        match self {
            Field::DisplayName => "Name",
            Field::LogonName => "Logon name",
            Field::Title => "Title",
            Field::Department => "Department",
            Field::Company => "Company",
            Field::Office => "Office",
            Field::Manager => "Manager",
            Field::AccountType => "Type",
            Field::Country => "Country",
            Field::Description => "Description",
            Field::EmployeeId => "Employee ID",
            Field::OfficePhone => "Office phone",
            Field::MobilePhone => "Mobile phone",
            Field::IpPhone => "IP phone",
            Field::HomePhone => "Home phone",
            Field::Fax => "Fax",
            Field::Pager => "Pager",
            Field::Created => "Created",
            Field::Expiration => "Expires",
            Field::Enabled => "Enabled",
            Field::DistinguishedName => "Distinguished name",
        }
    }

    /// Reads this field from a record
    pub fn cell(self, record: &AccountRecord) -> Cell {
        let text = |s: &str| Cell::Text(s.to_string());
        match self {
            Field::DisplayName => text(&record.display_name),
            Field::LogonName => text(&record.logon_name),
            Field::Title => text(&record.title),
            Field::Department => text(&record.department),
            Field::Company => text(&record.company),
            Field::Office => text(&record.office),
            Field::Manager => text(&record.manager),
            Field::AccountType => text(&record.account_type),
            Field::Country => text(&record.country),
            Field::Description => text(&record.description),
            Field::EmployeeId => text(&record.employee_id),
            Field::OfficePhone => text(&record.office_phone),
            Field::MobilePhone => text(&record.mobile_phone),
            Field::IpPhone => text(&record.ip_phone),
            Field::HomePhone => text(&record.home_phone),
            Field::Fax => text(&record.fax),
            Field::Pager => text(&record.pager),
            Field::Created => Cell::Timestamp(record.created),
            Field::Expiration => match record.expiration {
                Expiration::Never => text("Never"),
                Expiration::On(date) => Cell::Date(date),
            },
            Field::Enabled => Cell::Flag(record.enabled),
            Field::DistinguishedName => text(&record.distinguished_name),
        }
    }

    /// Whether this field must be stored as text
    pub fn is_text(self) -> bool {
        TEXT_FIELDS.contains(&self)
    }
}
