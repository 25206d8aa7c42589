//! Time and week helpers.
//!
//! HH:mm parsing and formatting, decimal hours between two clock times, and
//! ISO-8601 week numbering with Monday–Sunday boundaries.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{EngineError, EngineResult};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Parses an `HH:mm` clock time.
///
/// # Examples
///
/// ```
/// use wage_engine::calculation::parse_hhmm;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_hhmm("09:30").unwrap(), NaiveTime::from_hms_opt(9, 30, 0).unwrap());
/// assert!(parse_hhmm("25:00").is_err());
/// ```
pub fn parse_hhmm(value: &str) -> EngineResult<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| EngineError::InvalidField {
        field: "time".to_string(),
        message: format!("'{}' is not a valid HH:mm time", value),
    })
}

/// Formats a clock time as `HH:mm`.
pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Worked hours between two clock times, rounded to two decimal places.
///
/// An end time before the start time is taken to be on the next day.
///
/// # Examples
///
/// ```
/// use wage_engine::calculation::{hours_between, parse_hhmm};
/// use rust_decimal::Decimal;
///
/// let hours = hours_between(parse_hhmm("22:00").unwrap(), parse_hhmm("01:30").unwrap());
/// assert_eq!(hours, Decimal::new(35, 1));
/// ```
pub fn hours_between(start: NaiveTime, end: NaiveTime) -> Decimal {
    let mut minutes = (end - start).num_minutes();
    if minutes < 0 {
        minutes += MINUTES_PER_DAY;
    }
    (Decimal::from(minutes) / Decimal::from(60))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Formats decimal hours as `HH:mm` (2.5 becomes `02:30`).
pub fn format_hours_hhmm(hours: Decimal) -> String {
    let minutes = (hours.abs() * Decimal::from(60))
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or_default();
    let sign = if hours < Decimal::ZERO { "-" } else { "" };
    format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

/// ISO-8601 week-numbering year and week of `date`.
///
/// # Examples
///
/// ```
/// use wage_engine::calculation::iso_week_number;
/// use chrono::NaiveDate;
///
/// // 2025-12-29 is the Monday of ISO week 1 of 2026.
/// assert_eq!(iso_week_number(NaiveDate::from_ymd_opt(2025, 12, 29).unwrap()), (2026, 1));
/// ```
pub fn iso_week_number(date: NaiveDate) -> (i32, u32) {
    let week = date.iso_week();
    (week.year(), week.week())
}

/// Monday and Sunday of the week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let offset = i64::from(date.weekday().num_days_from_monday());
    let monday = date - Duration::days(offset);
    (monday, monday + Duration::days(6))
}
