//! Cell value parsing for imported spreadsheets
//!
//! Neither parser ever fails: an unknown outcome token is a loss and an
//! unknown date is `None`, which the importer turns into "now".

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, Timelike};

/// Outcome tokens (case-insensitive) that count as a win
pub const WIN_TOKENS: &[&str] = &["true", "1", "yes", "win", "victory"];

struct DateFormat {
    pattern: &'static str,
    with_time: bool,
}

const fn dt(pattern: &'static str) -> DateFormat {
    DateFormat { pattern, with_time: true }
}

const fn d(pattern: &'static str) -> DateFormat {
    DateFormat { pattern, with_time: false }
}

/// Tried first, in order. Month-first wins over day-first when both parse.
const EXPLICIT_FORMATS: &[DateFormat] = &[
    dt("%Y-%m-%d %H:%M:%S"),
    d("%Y-%m-%d"),
    dt("%m/%d/%Y %H:%M:%S"),
    d("%m/%d/%Y"),
    dt("%d/%m/%Y %H:%M:%S"),
    d("%d/%m/%Y"),
];

/// Generic shapes seen in spreadsheet exports, tried after the explicit list
const FALLBACK_FORMATS: &[DateFormat] = &[
    dt("%Y-%m-%dT%H:%M:%S%.f"),
    dt("%Y-%m-%d %H:%M:%S%.f"),
    dt("%Y-%m-%d %H:%M"),
    dt("%Y-%m-%dT%H:%M"),
    dt("%Y/%m/%d %H:%M:%S"),
    dt("%Y/%m/%d %H:%M"),
    d("%Y/%m/%d"),
    dt("%m/%d/%Y %H:%M"),
    dt("%m/%d/%Y %I:%M:%S %p"),
    dt("%m/%d/%Y %I:%M %p"),
    dt("%d/%m/%Y %H:%M"),
    dt("%d.%m.%Y %H:%M:%S"),
    dt("%d.%m.%Y %H:%M"),
    d("%d.%m.%Y"),
    d("%d-%m-%Y"),
    d("%B %d, %Y"),
    d("%b %d, %Y"),
    d("%d %B %Y"),
    d("%d %b %Y"),
];

/// Map an outcome cell to win (`true`) or loss (`false`)
pub fn parse_outcome(value: &str) -> bool {
    let value = value.trim();
    WIN_TOKENS.iter().any(|token| value.eq_ignore_ascii_case(token))
}

/// Parse a date cell, truncated to whole seconds.
///
/// Returns `None` for blank or unrecognised input.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    try_formats(value, EXPLICIT_FORMATS)
        .or_else(|| parse_zoned(value))
        .or_else(|| try_formats(value, FALLBACK_FORMATS))
        .map(|ts| ts.with_nanosecond(0).unwrap_or(ts))
}

fn try_formats(value: &str, formats: &[DateFormat]) -> Option<NaiveDateTime> {
    formats.iter().find_map(|format| {
        if format.with_time {
            NaiveDateTime::parse_from_str(value, format.pattern).ok()
        } else {
            NaiveDate::parse_from_str(value, format.pattern)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        }
    })
}

/// RFC 3339 / RFC 2822 timestamps, converted to local wall-clock time
fn parse_zoned(value: &str) -> Option<NaiveDateTime> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_rfc2822(value))
        .ok()
        .map(|ts| ts.with_timezone(&Local).naive_local())
}
