//! Directory account snapshot
//!
//! An [`AccountRecord`] is the reporting-relevant projection of one directory
//! user entry, captured at query time.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Account expiration
///
/// Directories store "never expires" as a sentinel value; it is decoded into
/// [`Expiration::Never`] at the adapter boundary so report code never compares
/// sentinels against real dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<NaiveDate>", into = "Option<NaiveDate>")]
pub enum Expiration {
    /// The account does not expire
    #[default]
    Never,
    /// The account expires on the given date
    On(NaiveDate),
}

impl Expiration {
    /// Date of expiry, if any
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Expiration::Never => None,
            Expiration::On(date) => Some(*date),
        }
    }
}

impl fmt::Display for Expiration {
    /// Renders `Never` or the date as `dd/mm/yyyy`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expiration::Never => write!(f, "Never"),
            Expiration::On(date) => write!(f, "{}", date.format("%d/%m/%Y")),
        }
    }
}

impl From<Option<NaiveDate>> for Expiration {
    fn from(value: Option<NaiveDate>) -> Self {
        value.map_or(Expiration::Never, Expiration::On)
    }
}

impl From<Expiration> for Option<NaiveDate> {
    fn from(value: Expiration) -> Self {
        value.date()
    }
}

/// A directory user entry and its reporting-relevant attributes
///
/// Contact fields (phones, fax, pager, employee ID) are opaque text: they are
/// never parsed, only passed through to the spreadsheet.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountRecord {
    /// Distinguished name, used to drop duplicates across overlapping scopes
    pub distinguished_name: String,
    pub display_name: String,
    /// Logon name (`sAMAccountName`)
    pub logon_name: String,
    pub title: String,
    pub department: String,
    pub company: String,
    pub office: String,
    /// Manager display name
    pub manager: String,
    /// Account type (`employeeType`)
    pub account_type: String,
    pub country: String,
    pub description: String,
    pub employee_id: String,
    pub office_phone: String,
    pub mobile_phone: String,
    pub ip_phone: String,
    pub home_phone: String,
    pub fax: String,
    pub pager: String,
    pub created: DateTime<Utc>,
    pub expiration: Expiration,
    pub enabled: bool,
}

impl AccountRecord {
    /// Creates an enabled, never-expiring record with the given name and creation time
    pub fn new(display_name: impl Into<String>, created: DateTime<Utc>) -> Self {
        Self {
            display_name: display_name.into(),
            created,
            enabled: true,
            ..Self::default()
        }
    }

    /// Sets the country
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = country.into();
        self
    }

    /// Sets the manager
    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager = manager.into();
        self
    }

    /// Sets the company
    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = company.into();
        self
    }

    /// Sets the account type
    pub fn with_account_type(mut self, account_type: impl Into<String>) -> Self {
        self.account_type = account_type.into();
        self
    }

    /// Sets the expiration
    pub fn with_expiration(mut self, expiration: Expiration) -> Self {
        self.expiration = expiration;
        self
    }

    /// Sets the distinguished name
    pub fn with_distinguished_name(mut self, dn: impl Into<String>) -> Self {
        self.distinguished_name = dn.into();
        self
    }

    /// Sets the employee ID
    pub fn with_employee_id(mut self, employee_id: impl Into<String>) -> Self {
        self.employee_id = employee_id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_expiration_display() {
        assert_eq!(Expiration::Never.to_string(), "Never");
        let date = NaiveDate::from_ymd_opt(2027, 3, 5).unwrap();
        assert_eq!(Expiration::On(date).to_string(), "05/03/2027");
    }

    #[test]
    fn test_expiration_serde_uses_null_for_never() {
        assert_eq!(serde_json::to_string(&Expiration::Never).unwrap(), "null");
        let parsed: Expiration = serde_json::from_str("\"2026-12-31\"").unwrap();
        assert_eq!(
            parsed,
            Expiration::On(NaiveDate::from_ymd_opt(2026, 12, 31).unwrap())
        );
    }

    #[test]
    fn test_account_record_builder() {
        let created = Utc.with_ymd_and_hms(2026, 10, 15, 9, 30, 0).unwrap();
        let record = AccountRecord::new("Jane Doe", created)
            .with_country("Belgium")
            .with_company("Contoso")
            .with_manager("John Smith")
            .with_account_type("Employee")
            .with_employee_id("00042");

        assert_eq!(record.display_name, "Jane Doe");
        assert_eq!(record.country, "Belgium");
        assert_eq!(record.employee_id, "00042");
        assert_eq!(record.expiration, Expiration::Never);
        assert!(record.enabled);
    }

    #[test]
    fn test_account_record_deserialize_partial() {
        let json = r#"{"display_name": "Jane", "created": "2026-10-15T09:30:00Z", "expiration": null}"#;
        let record: AccountRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.display_name, "Jane");
        assert_eq!(record.expiration, Expiration::Never);
        assert!(record.country.is_empty());
    }
}
