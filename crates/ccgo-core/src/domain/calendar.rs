//! Date stamps for templates.
//!
//! The `current_*` functions read the local clock on every call so a
//! long-running process picks up date changes.

use chrono::{Datelike, Local, NaiveDate};

/// Four-digit year of `date`.
pub fn format_year(date: NaiveDate) -> String {
    format!("{:04}", date.year())
}

/// `YYYY-MM-DD` rendering of `date`.
pub fn format_day(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Current local year, e.g. `"2024"`.
pub fn current_year() -> String {
    format_year(Local::now().date_naive())
}

/// Current local date, e.g. `"2024-05-01"`.
pub fn current_day() -> String {
    format_day(Local::now().date_naive())
}
