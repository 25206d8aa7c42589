//! Wage Engine for hourly and overtime payroll statements
//!
//! This crate aggregates daily work and overtime hours over a settlement
//! period into payments with 3.3% withholding, weekly subtotals, the weekly
//! holiday allowance owed to part-time employees, and grand totals. It also
//! prices 6- and 12-month subscription terms with tiered discounts.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod draft;
pub mod error;
pub mod models;
pub mod pricing;
pub mod resource;
