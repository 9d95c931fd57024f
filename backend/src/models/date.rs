//! Schedule date handling.
//!
//! Schedule dates travel as display strings in the fixed `DD/MM/YYYY`
//! convention used by the upstream spreadsheets. Parsing never fails: any
//! malformed value degrades to the Unix epoch so that it sorts first.

use chrono::{DateTime, NaiveDate};

/// Display format of schedule dates.
pub const SCHEDULE_DATE_FORMAT: &str = "%d/%m/%Y";

/// Date returned for malformed schedule date strings (1970-01-01).
pub fn epoch_sentinel() -> NaiveDate {
    DateTime::UNIX_EPOCH.date_naive()
}

/// Parse a `DD/MM/YYYY` string, returning `None` when it is malformed.
///
/// Exactly three slash-separated numeric parts are required and they must
/// form a real calendar date. Whitespace around each part is ignored.
pub fn try_parse_schedule_date(value: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].trim().parse().ok()?;
    let month: u32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;

    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse a `DD/MM/YYYY` string into a comparable date.
///
/// Malformed input yields [`epoch_sentinel`] instead of an error.
pub fn parse_schedule_date(value: &str) -> NaiveDate {
    try_parse_schedule_date(value).unwrap_or_else(epoch_sentinel)
}

/// Format a date back into the `DD/MM/YYYY` display form.
pub fn format_schedule_date(date: NaiveDate) -> String {
    date.format(SCHEDULE_DATE_FORMAT).to_string()
}
