//! Report building
//!
//! Turns the accounts returned by the directory into the pieces of the
//! notification: subject, intro sentence, per-country counts and detail rows.
//! Pure and deterministic: no clock, no I/O.

use crate::domain::{AccountRecord, DETAIL_FIELDS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Label used for accounts without a country
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Ordering of countries that have the same number of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the order in which countries first appear in the directory result
    #[default]
    FirstSeen,
    /// Ascending country name
    Country,
}

/// One row of the per-country table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryCount {
    pub country: String,
    pub count: usize,
}

/// One row of the detail table; cells follow [`DETAIL_FIELDS`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRow {
    pub cells: Vec<String>,
}

/// Everything the notification shows about one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Day threshold the report covers
    pub days: u32,
    /// Number of accounts found
    pub count: usize,
    pub subject: String,
    /// Intro sentence (plain text, escaped when rendered)
    pub intro: String,
    /// Accounts per country, most frequent first
    pub countries: Vec<CountryCount>,
    /// Detail rows sorted by country then name
    pub details: Vec<DetailRow>,
}

impl Report {
    /// Whether no account was found
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// Builds the report with the default tie-break (first seen)
pub fn build_report(records: &[AccountRecord], days: u32) -> Report {
    build_report_with(records, days, TieBreak::default())
}

/// Builds the report with an explicit tie-break for equal country counts
pub fn build_report_with(records: &[AccountRecord], days: u32, tie_break: TieBreak) -> Report {
    let count = records.len();
    let (countries, details) = if count == 0 {
        (Vec::new(), Vec::new())
    } else {
        (
            aggregate_by_country(records, tie_break),
            detail_rows(records),
        )
    };

    Report {
        days,
        count,
        subject: subject_line(count, days),
        intro: intro_line(count, days),
        countries,
        details,
    }
}

fn window(days: u32) -> String {
    if days == 1 {
        "the last 1 day".to_string()
    } else {
        format!("the last {days} days")
    }
}

fn subject_line(count: usize, days: u32) -> String {
    match count {
        0 => format!("No new users created in {}", window(days)),
        1 => format!("1 new user created in {}", window(days)),
        n => format!("{n} new users created in {}", window(days)),
    }
}

fn intro_line(count: usize, days: u32) -> String {
    match count {
        0 => format!("No new users have been created in {}.", window(days)),
        1 => format!("1 new user has been created in {}.", window(days)),
        n => format!("{n} new users have been created in {}.", window(days)),
    }
}

fn country_label(record: &AccountRecord) -> &str {
    let country = record.country.trim();
    if country.is_empty() {
        UNKNOWN_COUNTRY
    } else {
        country
    }
}

/// Counts accounts per country, most frequent first
///
/// Groups are created in first-seen order and sorted with a stable sort, so
/// equal counts keep that order unless `tie_break` asks for names.
fn aggregate_by_country(records: &[AccountRecord], tie_break: TieBreak) -> Vec<CountryCount> {
    let mut groups: Vec<CountryCount> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let label = country_label(record);
        match index.get(label) {
            Some(&i) => groups[i].count += 1,
            None => {
                index.insert(label, groups.len());
                groups.push(CountryCount {
                    country: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    match tie_break {
        TieBreak::FirstSeen => groups.sort_by(|a, b| b.count.cmp(&a.count)),
        TieBreak::Country => groups.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.country.to_lowercase().cmp(&b.country.to_lowercase()))
        }),
    }

    groups
}

/// Projects [`DETAIL_FIELDS`] for every record, sorted by country then name
///
/// Comparison ignores case; records equal on both keys keep directory order.
fn detail_rows(records: &[AccountRecord]) -> Vec<DetailRow> {
    let mut sorted: Vec<&AccountRecord> = records.iter().collect();
    sorted.sort_by_cached_key(|r| (r.country.to_lowercase(), r.display_name.to_lowercase()));

    sorted
        .into_iter()
        .map(|record| DetailRow {
            cells: DETAIL_FIELDS
                .iter()
                .map(|field| field.cell(record).display())
                .collect(),
        })
        .collect()
}
