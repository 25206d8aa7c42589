//! Settlement period model.
//!
//! A [`SettlementPeriod`] is the inclusive date range over which work hours are
//! aggregated for one payroll statement.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a settlement period with its inclusive date range.
///
/// # Example
///
/// ```
/// use wage_engine::models::SettlementPeriod;
/// use chrono::NaiveDate;
///
/// let period = SettlementPeriod {
///     start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2025, 3, 15).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SettlementPeriod {
    /// The start date of the period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the period (inclusive).
    pub end_date: NaiveDate,
}

impl SettlementPeriod {
    /// Creates a period, rejecting an end date before the start date.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        let period = Self {
            start_date,
            end_date,
        };
        period.validate()?;
        Ok(period)
    }

    /// Returns the period covering one calendar month.
    pub fn calendar_month(year: i32, month: u32) -> EngineResult<Self> {
        let invalid = || EngineError::InvalidField {
            field: "period".to_string(),
            message: format!("{}-{:02} is not a valid month", year, month),
        };
        let start_date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
        let next_month = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .ok_or_else(invalid)?;
        Ok(Self {
            start_date,
            end_date: next_month - Duration::days(1),
        })
    }

    /// Checks that the start date is not after the end date.
    pub fn validate(&self) -> EngineResult<()> {
        if self.start_date > self.end_date {
            return Err(EngineError::InvalidField {
                field: "period".to_string(),
                message: format!(
                    "start date {} is after end date {}",
                    self.start_date, self.end_date
                ),
            });
        }
        Ok(())
    }

    /// Checks if a given date falls within this period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if the two inclusive ranges share at least one day.
    pub fn overlaps(&self, other: &SettlementPeriod) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}
