//! Calculation logic for the Wage Engine.
//!
//! This module contains the calculation functions for a payroll statement:
//! clock-time and ISO week helpers, daily payment and withholding, weekly
//! grouping, the weekly holiday allowance for part-time employees, grand
//! totals, and the [`WageEngine`] that runs them in order.

mod daily_payment;
mod engine;
mod grand_total;
mod holiday_allowance;
mod time_utils;
mod weekly_aggregator;

pub use daily_payment::{
    DEFAULT_WITHHOLDING_RATE, DailyRecordResult, calculate_daily_record, compute_daily,
    round_currency,
};
pub use engine::{
    MAX_CARRY_OVER_HOURS, MAX_DAILY_HOURS, MAX_HOURLY_RATE, RecordEdit, SettlementInput,
    WageEngine,
};
pub use grand_total::reduce_totals;
pub use holiday_allowance::{
    DEFAULT_ALLOWANCE_DIVISOR, DEFAULT_MIN_WEEKLY_HOURS, HolidayAllowanceResult,
    HolidayAllowanceRule, calculate_holiday_allowance, compute_holiday_allowance,
};
pub use time_utils::{
    format_hhmm, format_hours_hhmm, hours_between, iso_week_number, parse_hhmm, week_bounds,
};
pub use weekly_aggregator::group_by_week;
