//! Common value types and numeric helpers used throughout BatiDevis RS

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Date range (start_date to end_date), used for project scheduling
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DateRange {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start_date: start,
            end_date: end,
        }
    }

    pub fn duration_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((end - start).num_days()),
            _ => None,
        }
    }
}

/// Clamp a monetary quantity or price to a usable value.
///
/// Aggregations in the engines are total functions: a NaN, infinite, or
/// negative input contributes zero instead of poisoning a whole report.
pub fn sane_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Round a monetary amount to cents
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Units that count as hours when totalling labor time
pub const HOUR_UNITS: [&str; 3] = ["h", "hour", "heure"];

pub fn is_hour_unit(unit: &str) -> bool {
    HOUR_UNITS.iter().any(|u| unit.trim().eq_ignore_ascii_case(u))
}

/// Document numbering follows the house convention: quotes are
/// `DEV-<year>-<4-digit-sequence>`, projects `PROJ-<year>-<4-digit-sequence>`.
/// Numbers are allocated by the persistence layer; the helpers here only
/// format them consistently.
pub const QUOTE_NUMBER_PREFIX: &str = "DEV";
pub const PROJECT_NUMBER_PREFIX: &str = "PROJ";

pub fn format_quote_number(year: i32, sequence: u32) -> String {
    format!("{}-{}-{:04}", QUOTE_NUMBER_PREFIX, year, sequence)
}

pub fn format_project_number(year: i32, sequence: u32) -> String {
    format!("{}-{}-{:04}", PROJECT_NUMBER_PREFIX, year, sequence)
}
