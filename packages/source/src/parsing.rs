//! Date parsing for case exports.
//!
//! Exports mix ISO dates, ISO datetimes and Brazilian `dd/mm/yyyy` dates.
//! Anything unrecognized becomes `None` rather than an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Date-only formats, tried in order. Day-first wins over month-first for
/// ambiguous slash dates; the year is the same either way.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%Y/%m/%d"];

/// Date-and-time formats, tried in order after [`DATE_FORMATS`].
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parses a case date. Returns `None` for blank or unparseable input.
#[must_use]
pub fn parse_case_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return Some(date);
        }
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}
