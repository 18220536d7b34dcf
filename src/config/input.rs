//! Job input loading
//!
//! The job input is a small JSON document naming who receives the report,
//! which organizational units are searched and how far back "new" reaches:
//!
//! ```json
//! {
//!   "MailTo": ["hr@contoso.net"],
//!   "OU": ["OU=Users,OU=BEL,DC=contoso,DC=net"],
//!   "Days": 7
//! }
//! ```
//!
//! Validation happens property by property so the resulting [`InputError`]
//! names exactly what is wrong.

use crate::domain::errors::InputError;
use crate::domain::ids::Scope;
use lettre::Address;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;

const MAIL_TO: &str = "MailTo";
const SCOPES: &str = "OU";
const DAYS: &str = "Days";

/// Largest accepted `Days` value (one hundred years)
pub const MAX_DAYS: u32 = 36_500;

/// Validated job parameters for one run
///
/// Built once by [`load_input`] and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportConfig {
    /// Report recipients
    pub mail_to: Vec<String>,
    /// Admin addresses (bcc on the report, recipients of failure notifications)
    pub admins: Vec<String>,
    /// Organizational units searched
    pub scopes: Vec<Scope>,
    /// Recency window in days, always > 0
    pub days: u32,
}

/// Loads and validates the job input file
///
/// # Errors
///
/// Returns the [`InputError`] variant matching the first missing or malformed
/// property, checked in the order `MailTo`, `OU`, `Days`.
pub fn load_input(path: impl AsRef<Path>, admins: &[String]) -> Result<ReportConfig, InputError> {
    let path = path.as_ref();
    let label = path.display().to_string();

    if !path.exists() {
        return Err(InputError::NotFound(label));
    }

    let contents = fs::read_to_string(path).map_err(|e| InputError::Unreadable {
        path: label.clone(),
        message: e.to_string(),
    })?;

    parse_input(&contents, &label, admins)
}

/// Parses and validates job input from a JSON string
///
/// `source` only labels error messages.
pub fn parse_input(
    contents: &str,
    source: &str,
    admins: &[String],
) -> Result<ReportConfig, InputError> {
    let value: Value = serde_json::from_str(contents).map_err(|e| InputError::InvalidFormat {
        path: source.to_string(),
        message: e.to_string(),
    })?;

    let object = value.as_object().ok_or_else(|| InputError::InvalidFormat {
        path: source.to_string(),
        message: "expected a JSON object at the top level".to_string(),
    })?;

    let mail_to = parse_mail_to(object)?;
    let scopes = parse_scopes(object)?;
    let days = parse_days(object)?;

    Ok(ReportConfig {
        mail_to,
        admins: admins.to_vec(),
        scopes,
        days,
    })
}

fn parse_mail_to(object: &Map<String, Value>) -> Result<Vec<String>, InputError> {
    let addresses = string_list(object.get(MAIL_TO)).map_err(InputError::InvalidMailTo)?;
    if addresses.is_empty() {
        return Err(InputError::MissingMailTo);
    }

    for address in &addresses {
        if address.parse::<Address>().is_err() {
            return Err(InputError::InvalidMailTo(address.clone()));
        }
    }

    Ok(addresses)
}

fn parse_scopes(object: &Map<String, Value>) -> Result<Vec<Scope>, InputError> {
    let names = string_list(object.get(SCOPES)).map_err(|_| InputError::MissingScopes)?;
    let scopes: Vec<Scope> = names.into_iter().filter_map(|n| Scope::new(n).ok()).collect();
    if scopes.is_empty() {
        return Err(InputError::MissingScopes);
    }
    Ok(scopes)
}

fn parse_days(object: &Map<String, Value>) -> Result<u32, InputError> {
    match object.get(DAYS) {
        None | Some(Value::Null) => Err(InputError::MissingDays),
        Some(Value::Number(n)) => {
            let raw = n.to_string();
            match (n.as_i64(), n.as_f64()) {
                (Some(days), _) => checked_days(days, &raw),
                (None, Some(days)) => whole_days(days, &raw),
                (None, None) => Err(InputError::DaysNotNumeric(raw)),
            }
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Err(InputError::MissingDays);
            }
            if let Ok(days) = trimmed.parse::<i64>() {
                return checked_days(days, trimmed);
            }
            match trimmed.parse::<f64>() {
                Ok(days) if days.is_finite() => whole_days(days, trimmed),
                _ => Err(InputError::DaysNotNumeric(trimmed.to_string())),
            }
        }
        Some(other) => Err(InputError::DaysNotNumeric(other.to_string())),
    }
}

fn checked_days(days: i64, raw: &str) -> Result<u32, InputError> {
    if days <= 0 {
        return Err(InputError::DaysNotPositive(raw.to_string()));
    }
    u32::try_from(days)
        .ok()
        .filter(|d| *d <= MAX_DAYS)
        .ok_or_else(|| InputError::DaysTooLarge {
            found: raw.to_string(),
            max: MAX_DAYS,
        })
}

/// Accepts floats holding a whole number (`7.0`)
fn whole_days(days: f64, raw: &str) -> Result<u32, InputError> {
    if days <= 0.0 || days.fract() != 0.0 {
        return Err(InputError::DaysNotPositive(raw.to_string()));
    }
    if days > f64::from(MAX_DAYS) {
        return Err(InputError::DaysTooLarge {
            found: raw.to_string(),
            max: MAX_DAYS,
        });
    }
    Ok(days as u32)
}

/// Reads a property holding one string or an array of strings
///
/// Blank entries are dropped; a non-string entry is returned as the error.
fn string_list(value: Option<&Value>) -> Result<Vec<String>, String> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(non_blank(s).into_iter().collect()),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => out.extend(non_blank(s)),
                    Value::Null => {}
                    other => return Err(other.to_string()),
                }
            }
            Ok(out)
        }
        Some(other) => Err(other.to_string()),
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
