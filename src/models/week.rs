//! Weekly grouping models.
//!
//! This module contains the [`WeekBucket`] subtotal for one Monday–Sunday
//! week and the [`WeeklyHolidayAllowance`] attached to it for part-time
//! employees.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Subtotal of all daily records falling in one ISO-8601 week.
///
/// Serialized output carries a derived `total_hours` field (work plus
/// overtime), which is ignored when deserializing.
///
/// # Example
///
/// ```
/// use wage_engine::models::WeekBucket;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let bucket = WeekBucket {
///     iso_year: 2026,
///     week_number: 1,
///     week_start_date: NaiveDate::from_ymd_opt(2025, 12, 29).unwrap(),
///     week_end_date: NaiveDate::from_ymd_opt(2026, 1, 4).unwrap(),
///     dates: vec![],
///     work_hours: Decimal::new(8, 0),
///     overtime_hours: Decimal::new(2, 0),
///     payment_amount: Decimal::ZERO,
///     deduction_amount: Decimal::ZERO,
///     net_amount: Decimal::ZERO,
/// };
/// assert_eq!(bucket.total_hours(), Decimal::new(10, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeekBucket {
    /// ISO-8601 week-numbering year (may differ from the calendar year near January 1).
    pub iso_year: i32,
    /// ISO-8601 week of the year (1-53).
    pub week_number: u32,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Sunday of the week.
    pub week_end_date: NaiveDate,
    /// Dates of the member records, ascending.
    pub dates: Vec<NaiveDate>,
    /// Sum of contracted work hours.
    pub work_hours: Decimal,
    /// Sum of overtime hours.
    pub overtime_hours: Decimal,
    /// Sum of gross payments.
    pub payment_amount: Decimal,
    /// Sum of withholdings.
    pub deduction_amount: Decimal,
    /// Sum of net payments.
    pub net_amount: Decimal,
}

impl WeekBucket {
    /// Work plus overtime hours of the week.
    pub fn total_hours(&self) -> Decimal {
        self.work_hours + self.overtime_hours
    }

    /// True if the date falls between this week's Monday and Sunday.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.week_start_date && date <= self.week_end_date
    }
}

impl Serialize for WeekBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("WeekBucket", 11)?;
        state.serialize_field("iso_year", &self.iso_year)?;
        state.serialize_field("week_number", &self.week_number)?;
        state.serialize_field("week_start_date", &self.week_start_date)?;
        state.serialize_field("week_end_date", &self.week_end_date)?;
        state.serialize_field("dates", &self.dates)?;
        state.serialize_field("work_hours", &self.work_hours)?;
        state.serialize_field("overtime_hours", &self.overtime_hours)?;
        state.serialize_field("total_hours", &self.total_hours())?;
        state.serialize_field("payment_amount", &self.payment_amount)?;
        state.serialize_field("deduction_amount", &self.deduction_amount)?;
        state.serialize_field("net_amount", &self.net_amount)?;
        state.end()
    }
}

/// Weekly paid-holiday allowance entitlement for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHolidayAllowance {
    /// ISO-8601 week-numbering year of the week.
    pub iso_year: i32,
    /// ISO-8601 week number of the week.
    pub week_number: u32,
    /// Monday of the week.
    pub week_start_date: NaiveDate,
    /// Sunday of the week.
    pub week_end_date: NaiveDate,
    /// Hours carried over from the prior settlement period into this week.
    pub carry_over_hours: Decimal,
    /// Work hours in the week, including any carry-over.
    pub total_work_hours_for_week: Decimal,
    /// Whether the week meets the minimum weekly hours.
    pub is_eligible: bool,
    /// Paid allowance hours (two decimal places).
    pub allowance_hours: Decimal,
    /// Hourly rate the allowance is paid at.
    pub hourly_rate: Decimal,
    /// Gross allowance payment.
    pub allowance_amount: Decimal,
    /// Withholding on the allowance.
    pub deduction_amount: Decimal,
    /// Allowance less withholding.
    pub net_amount: Decimal,
}
