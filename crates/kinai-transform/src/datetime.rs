//! Date/time parsing for `date` fields.
//!
//! Accepts a fixed list of formats so results never depend on the host
//! locale:
//!
//! - RFC 3339 with offset (`2024-01-15T10:30:00+02:00`, `...Z`), converted to UTC
//! - ISO 8601 extended without offset (`2024-01-15T10:30`, `2024-01-15T10:30:00.250`)
//! - Space-separated date and time (`2024-01-15 10:30:00`)
//! - Date only (`2024-01-15`, `2024/01/15`, `01/15/2024`), read as midnight

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a date/time value, returning `None` when no format matches.
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}
