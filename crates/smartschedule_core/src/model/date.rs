//! Calendar-day helpers.
//!
//! Days are local calendar dates without time or zone, persisted as
//! `YYYY-MM-DD`.

use chrono::{Datelike, Days, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Canonical persisted/display format for a calendar day.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Years that render as exactly four digits in `DAY_FORMAT`.
pub const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

// Accepts a bare day or the day prefix of an ISO-8601 timestamp.
static DAY_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})(?:$|[T ])").expect("valid day regex")
});

/// Parses loosely formatted day input.
///
/// Accepts `YYYY-MM-DD`, unpadded month/day (`2024-5-1`) and full timestamps
/// (`2024-05-01T09:30:00Z`, only the day part is kept). Returns `None` for
/// anything else, including impossible dates such as `2024-02-30`.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let captures = DAY_PREFIX_RE.captures(raw.trim())?;
    let year = captures[1].parse::<i32>().ok()?;
    let month = captures[2].parse::<u32>().ok()?;
    let day = captures[3].parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Formats a day in the canonical `YYYY-MM-DD` form.
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Whether `date` survives a `format_day` / `parse_day` round trip.
pub fn is_storable_day(date: NaiveDate) -> bool {
    STORABLE_YEARS.contains(&date.year())
}

/// Moves `date` by a signed number of days.
///
/// Returns `date` unchanged when the result would leave the storable years.
pub fn shift_day(date: NaiveDate, days: i64) -> NaiveDate {
    let magnitude = Days::new(days.unsigned_abs());
    let shifted = if days >= 0 {
        date.checked_add_days(magnitude)
    } else {
        date.checked_sub_days(magnitude)
    };
    shifted.filter(|day| is_storable_day(*day)).unwrap_or(date)
}
