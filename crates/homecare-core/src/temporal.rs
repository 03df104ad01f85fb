//! # Calendar Dates
//!
//! Record dates are stored as text, normally `YYYY-MM-DD`. Older documents
//! and imports may carry full RFC 3339 timestamps instead, so reading a
//! date accepts either form. Anything else is "no date".

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};

/// Storage format of record dates.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a stored record date.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp (the calendar date in its
/// own offset is used), or a naive `YYYY-MM-DDTHH:MM:SS[.fff]` timestamp.
/// Returns `None` for anything else, including the empty string.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, ISO_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}

/// Render a date in storage format.
pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Shift a date by a signed number of days, saturating at the calendar
/// bounds.
pub fn offset_days(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.unwrap_or(date)
}
