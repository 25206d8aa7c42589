//! Request types for the Wage Engine API.
//!
//! This module defines the JSON request structures for the payroll, pricing
//! and draft endpoints and their conversion into domain inputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculation::{RecordEdit, SettlementInput, hours_between, parse_hhmm};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    DailyEntry, EmploymentType, PayrollComputation, SalaryCycle, SettlementPeriod,
};
use crate::pricing::{Discount, PricingRecord, TermMonths};

/// Request body for the `/payroll/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// The employee the statement is for.
    pub employee_id: String,
    /// The type of employment arrangement.
    pub employment_type: EmploymentType,
    /// The settlement period; derived from `salary_cycle` and `pay_month` when absent.
    #[serde(default)]
    pub period: Option<PeriodRequest>,
    /// Salary cycle from the employment contract.
    #[serde(default)]
    pub salary_cycle: Option<SalaryCycle>,
    /// Any day in the month the wages are paid.
    #[serde(default)]
    pub pay_month: Option<NaiveDate>,
    /// Hourly wage for the period.
    pub hourly_wage: Decimal,
    /// Per-day hours.
    #[serde(default)]
    pub daily_entries: Vec<DailyEntryRequest>,
    /// Hours worked before the period start in the first week.
    #[serde(default)]
    pub carry_over_hours: Option<Decimal>,
}

/// A date range in a request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// The first day (inclusive).
    pub start_date: NaiveDate,
    /// The last day (inclusive).
    pub end_date: NaiveDate,
}

/// One day of hours in a calculation request.
///
/// Work hours may be given directly or as `HH:mm` clock times; explicit
/// hours take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyEntryRequest {
    /// The calendar day.
    pub date: NaiveDate,
    /// Contracted work hours.
    #[serde(default)]
    pub work_hours: Option<Decimal>,
    /// Clock-in time, `HH:mm`.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Clock-out time, `HH:mm`; before `start_time` means the next day.
    #[serde(default)]
    pub end_time: Option<String>,
    /// Overtime hours.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// Hourly rate override for this day.
    #[serde(default)]
    pub apply_hourly_rate: Option<Decimal>,
}

impl From<PeriodRequest> for SettlementPeriod {
    fn from(req: PeriodRequest) -> Self {
        SettlementPeriod {
            start_date: req.start_date,
            end_date: req.end_date,
        }
    }
}

impl TryFrom<DailyEntryRequest> for DailyEntry {
    type Error = EngineError;

    fn try_from(req: DailyEntryRequest) -> EngineResult<Self> {
        let work_hours = match (req.work_hours, &req.start_time, &req.end_time) {
            (Some(hours), _, _) => hours,
            (None, Some(start), Some(end)) => {
                let invalid_time = |field: &str, e: EngineError| EngineError::InvalidRecord {
                    date: req.date,
                    field: field.to_string(),
                    message: e.to_string(),
                };
                let start = parse_hhmm(start).map_err(|e| invalid_time("start_time", e))?;
                let end = parse_hhmm(end).map_err(|e| invalid_time("end_time", e))?;
                hours_between(start, end)
            }
            (None, Some(_), None) | (None, None, Some(_)) => {
                return Err(EngineError::InvalidRecord {
                    date: req.date,
                    field: "end_time".to_string(),
                    message: "start_time and end_time must be given together".to_string(),
                });
            }
            (None, None, None) => Decimal::ZERO,
        };

        Ok(DailyEntry {
            date: req.date,
            work_hours,
            overtime_hours: req.overtime_hours.unwrap_or_default(),
            apply_hourly_rate: req.apply_hourly_rate,
        })
    }
}

impl CalculationRequest {
    /// Resolves the settlement period.
    ///
    /// An explicit period wins; otherwise the salary cycle seeds it from the
    /// pay month.
    pub fn settlement_period(&self) -> EngineResult<SettlementPeriod> {
        match (self.period, self.salary_cycle, self.pay_month) {
            (Some(period), _, _) => Ok(period.into()),
            (None, Some(cycle), Some(pay_month)) => cycle.default_settlement_period(pay_month),
            (None, Some(_), None) => Err(EngineError::MissingInput {
                field: "pay_month".to_string(),
            }),
            (None, None, _) => Err(EngineError::MissingInput {
                field: "period".to_string(),
            }),
        }
    }
}

impl TryFrom<CalculationRequest> for SettlementInput {
    type Error = EngineError;

    fn try_from(req: CalculationRequest) -> EngineResult<Self> {
        let period = req.settlement_period()?;
        let daily_entries = req
            .daily_entries
            .into_iter()
            .map(DailyEntry::try_from)
            .collect::<EngineResult<Vec<_>>>()?;

        Ok(SettlementInput {
            employee_id: req.employee_id,
            employment_type: req.employment_type,
            period,
            hourly_wage: req.hourly_wage,
            daily_entries,
            carry_over_hours: req.carry_over_hours,
        })
    }
}

/// Request body for the `/payroll/recalculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecalculationRequest {
    /// The statement currently shown.
    pub computation: PayrollComputation,
    /// The user's change.
    pub edit: RecordEdit,
}

/// Request body for the `/pricing/discount` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountRequest {
    /// Price per month.
    #[serde(default)]
    pub monthly_price: Option<Decimal>,
    /// 6 or 12.
    pub term_months: TermMonths,
    /// The discount to apply.
    pub discount: Discount,
}

/// Request body for the `/pricing` endpoint.
///
/// Without an `id` a new record is created; with one the existing record is
/// edited in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingRequest {
    /// Existing record to edit.
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Record title.
    pub title: String,
    /// Dates the price is offered on.
    pub period: PeriodRequest,
    /// Price per month.
    #[serde(default)]
    pub monthly_price: Option<Decimal>,
    /// 6 or 12.
    pub term_months: TermMonths,
    /// The discount to apply.
    pub discount: Discount,
}

impl PricingRequest {
    /// Applies the request to `existing`, or starts a new draft.
    pub fn into_draft(self, existing: Option<PricingRecord>) -> PricingRecord {
        match existing {
            Some(record) => PricingRecord {
                title: self.title,
                period: self.period.into(),
                monthly_price: self.monthly_price,
                term_months: self.term_months,
                discount: self.discount,
                ..record.into_draft()
            },
            None => PricingRecord::draft(
                self.title,
                self.period.into(),
                self.monthly_price,
                self.term_months,
                self.discount,
            ),
        }
    }
}

/// Request body for the `/drafts/{feature}/take` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TakeDraftRequest {
    /// The employee whose statement is being shown.
    pub employee_id: String,
    /// The period being shown.
    pub period: PeriodRequest,
}
