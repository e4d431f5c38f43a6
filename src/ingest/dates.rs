//! Tolerant date parsing for sheet values.
//!
//! Form timestamps come out of Google Sheets in the spreadsheet locale
//! (`19/10/2026 14:03:22` for pt-BR), while hand-filled columns mix several
//! layouts. Anything unrecognized yields `None`; callers treat that as
//! "no date", never as an error.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::is_absent;

/// Date-time layouts tried in order.
const DATETIME_FORMATS: [&str; 6] = [
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts tried in order.
const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];

/// Parse a timestamp, keeping the time of day when present.
///
/// Date-only values map to midnight. RFC 3339 values with an offset are
/// converted to their local wall-clock reading in that offset.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let v = value.trim();
    if is_absent(v) {
        return None;
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(v, fmt) {
            return Some(dt);
        }
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(v) {
        return Some(dt.naive_local());
    }
    parse_date(v).map(|d| d.and_time(NaiveTime::MIN))
}

/// Parse a calendar date, ignoring any time of day.
#[must_use]
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let v = value.trim();
    if is_absent(v) {
        return None;
    }

    // "19/10/2026 14:03" → look only at the date part
    let date_part = v.split_whitespace().next().unwrap_or(v);
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(date_part, fmt) {
            return Some(d);
        }
    }

    let date_part = v.split('T').next().unwrap_or(v);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}
