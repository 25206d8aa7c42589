//! Daily work records.
//!
//! A [`DailyEntry`] is what the hours provider or the user supplies for one
//! calendar day; a [`DailyRecord`] is the same day with its pay figures
//! derived by the engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Hours worked on one calendar day, as supplied to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyEntry {
    /// The calendar date (unique within a settlement period).
    pub date: NaiveDate,
    /// Contracted work hours.
    #[serde(default)]
    pub work_hours: Decimal,
    /// Overtime hours.
    #[serde(default)]
    pub overtime_hours: Decimal,
    /// User override for the hourly rate; the period wage applies when absent.
    #[serde(default)]
    pub apply_hourly_rate: Option<Decimal>,
}

/// Payment figures derived from hours and an hourly rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DailyAmounts {
    /// Gross payment, rounded to the currency unit.
    pub payment_amount: Decimal,
    /// Statutory withholding, rounded to the currency unit.
    pub deduction_amount: Decimal,
    /// Payment less withholding.
    pub net_amount: Decimal,
}

/// One calendar day's work contribution with derived payment figures.
///
/// # Examples
///
/// ```
/// use wage_engine::models::DailyRecord;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let record = DailyRecord {
///     date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///     work_hours: Decimal::new(4, 0),
///     overtime_hours: Decimal::new(15, 1),
///     apply_hourly_rate: Decimal::new(10_030, 0),
///     contract_hourly_rate: Decimal::new(10_030, 0),
///     payment_amount: Decimal::ZERO,
///     deduction_amount: Decimal::ZERO,
///     net_amount: Decimal::ZERO,
/// };
/// assert_eq!(record.payable_hours(), Decimal::new(55, 1));
/// assert!(!record.is_rate_overridden());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// The calendar date.
    pub date: NaiveDate,
    /// Contracted work hours.
    pub work_hours: Decimal,
    /// Overtime hours.
    pub overtime_hours: Decimal,
    /// Hourly rate the payment was computed with.
    pub apply_hourly_rate: Decimal,
    /// Reference rate from the employment contract.
    pub contract_hourly_rate: Decimal,
    /// Gross payment for the day.
    pub payment_amount: Decimal,
    /// Withholding for the day.
    pub deduction_amount: Decimal,
    /// Net payment for the day.
    pub net_amount: Decimal,
}

impl DailyRecord {
    /// Hours the day is paid for: work plus overtime.
    pub fn payable_hours(&self) -> Decimal {
        self.work_hours + self.overtime_hours
    }

    /// True when the user replaced the contract rate for this day.
    pub fn is_rate_overridden(&self) -> bool {
        self.apply_hourly_rate != self.contract_hourly_rate
    }

    /// Converts the record back into an editable entry, keeping a rate override.
    pub fn to_entry(&self) -> DailyEntry {
        DailyEntry {
            date: self.date,
            work_hours: self.work_hours,
            overtime_hours: self.overtime_hours,
            apply_hourly_rate: self
                .is_rate_overridden()
                .then_some(self.apply_hourly_rate),
        }
    }
}
