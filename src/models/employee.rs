//! Employment types and salary cycles.
//!
//! This module defines the EmploymentType enum and the salary-cycle metadata
//! used to seed default settlement periods.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::SettlementPeriod;
use crate::error::{EngineError, EngineResult};

/// Represents the type of employment arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Full-time employee paid by statement for overtime hours only.
    FullTime,
    /// Part-time employee paid by the hour, entitled to the weekly holiday allowance.
    PartTime,
}

impl EmploymentType {
    /// Returns true if this arrangement earns the weekly paid-holiday allowance.
    ///
    /// # Examples
    ///
    /// ```
    /// use wage_engine::models::EmploymentType;
    ///
    /// assert!(EmploymentType::PartTime.supports_holiday_allowance());
    /// assert!(!EmploymentType::FullTime.supports_holiday_allowance());
    /// ```
    pub fn supports_holiday_allowance(self) -> bool {
        matches!(self, EmploymentType::PartTime)
    }

    /// Returns the snake_case label used in audit records.
    pub fn as_str(self) -> &'static str {
        match self {
            EmploymentType::FullTime => "full_time",
            EmploymentType::PartTime => "part_time",
        }
    }
}

/// When wages for a settlement month are paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleKind {
    /// Wages for a month are paid within that same month.
    CurrentMonth,
    /// Wages for a month are paid in the following month.
    NextMonth,
}

/// Salary-cycle metadata from the employment contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryCycle {
    /// Day of month wages are paid (1-31, clamped to the month's last day).
    pub pay_day: u32,
    /// Which month a payment settles.
    pub kind: CycleKind,
}

impl SalaryCycle {
    /// Returns the pay date inside the month containing `pay_month`.
    ///
    /// # Examples
    ///
    /// ```
    /// use wage_engine::models::{CycleKind, SalaryCycle};
    /// use chrono::NaiveDate;
    ///
    /// let cycle = SalaryCycle { pay_day: 31, kind: CycleKind::NextMonth };
    /// let pay_date = cycle.pay_date(NaiveDate::from_ymd_opt(2025, 2, 10).unwrap()).unwrap();
    /// assert_eq!(pay_date, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap());
    /// ```
    pub fn pay_date(&self, pay_month: NaiveDate) -> EngineResult<NaiveDate> {
        if !(1..=31).contains(&self.pay_day) {
            return Err(EngineError::InvalidField {
                field: "pay_day".to_string(),
                message: format!("{} is not a day of the month", self.pay_day),
            });
        }
        let month = SettlementPeriod::calendar_month(pay_month.year(), pay_month.month())?;
        let day = self.pay_day.min(month.end_date.day());
        Ok(month.start_date.with_day(day).unwrap_or(month.end_date))
    }

    /// Returns the default settlement period for the payment made in `pay_month`.
    ///
    /// A current-month cycle settles the pay month itself; a next-month cycle
    /// settles the previous calendar month.
    pub fn default_settlement_period(&self, pay_month: NaiveDate) -> EngineResult<SettlementPeriod> {
        self.pay_date(pay_month)?;
        match self.kind {
            CycleKind::CurrentMonth => {
                SettlementPeriod::calendar_month(pay_month.year(), pay_month.month())
            }
            CycleKind::NextMonth => {
                let (year, month) = if pay_month.month() == 1 {
                    (pay_month.year() - 1, 12)
                } else {
                    (pay_month.year(), pay_month.month() - 1)
                };
                SettlementPeriod::calendar_month(year, month)
            }
        }
    }
}
