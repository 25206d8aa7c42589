//! Core data models for the Wage Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod calculation_result;
mod daily_record;
mod employee;
mod settlement;
mod week;

pub use calculation_result::{
    AuditStep, AuditTrace, AuditWarning, PayrollComputation, PayrollFeature, PeriodTotals,
    WorkTimeEditData,
};
pub use daily_record::{DailyAmounts, DailyEntry, DailyRecord};
pub use employee::{CycleKind, EmploymentType, SalaryCycle};
pub use settlement::SettlementPeriod;
pub use week::{WeekBucket, WeeklyHolidayAllowance};
