//! Settlement-period orchestration.
//!
//! [`WageEngine`] runs the whole pipeline for one employee and period:
//! input validation, daily payments, weekly grouping, holiday allowances for
//! part-time employees, grand totals and the audit trace. The same engine
//! serves the part-time and overtime statements; the employment type decides
//! whether the holiday allowance applies.

use std::collections::HashSet;
use std::time::Instant;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, DailyEntry, DailyRecord, EmploymentType,
    PayrollComputation, SettlementPeriod, WeeklyHolidayAllowance,
};

use super::daily_payment::calculate_daily_record;
use super::grand_total::reduce_totals;
use super::holiday_allowance::calculate_holiday_allowance;
use super::weekly_aggregator::group_by_week;

/// Maximum payable hours in one calendar day.
pub const MAX_DAILY_HOURS: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// Upper bound on carry-over hours: six earlier days of the first week.
pub const MAX_CARRY_OVER_HOURS: Decimal = Decimal::from_parts(144, 0, 0, false, 0);

/// Upper bound on any hourly rate, period wage or per-day override.
pub const MAX_HOURLY_RATE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Everything needed to compute one payroll statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementInput {
    /// The employee the statement is for.
    pub employee_id: String,
    /// Decides whether the weekly holiday allowance applies.
    pub employment_type: EmploymentType,
    /// The settlement period.
    pub period: SettlementPeriod,
    /// Hourly wage for the period, used for days without an override.
    pub hourly_wage: Decimal,
    /// Hours per day, any order.
    pub daily_entries: Vec<DailyEntry>,
    /// Hours worked before the period start in the period's first week.
    #[serde(default)]
    pub carry_over_hours: Option<Decimal>,
}

/// A user override of one day's hours or rate.
///
/// Unset fields keep their previous value. Editing a date without a record
/// adds one, provided the date lies inside the period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEdit {
    /// The date being edited.
    pub date: NaiveDate,
    /// New contracted work hours.
    #[serde(default)]
    pub work_hours: Option<Decimal>,
    /// New overtime hours.
    #[serde(default)]
    pub overtime_hours: Option<Decimal>,
    /// New hourly rate for this day only.
    #[serde(default)]
    pub apply_hourly_rate: Option<Decimal>,
    /// Drops an existing rate override so the period wage applies again.
    #[serde(default)]
    pub reset_hourly_rate: bool,
}

/// Computes payroll statements under a loaded rule set.
///
/// # Example
///
/// ```no_run
/// use wage_engine::calculation::{SettlementInput, WageEngine};
/// use wage_engine::config::ConfigLoader;
/// use wage_engine::models::{DailyEntry, EmploymentType, SettlementPeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/payroll").unwrap();
/// let engine = WageEngine::new(loader.config());
///
/// let input = SettlementInput {
///     employee_id: "emp_001".to_string(),
///     employment_type: EmploymentType::PartTime,
///     period: SettlementPeriod::calendar_month(2025, 3).unwrap(),
///     hourly_wage: Decimal::new(10_030, 0),
///     daily_entries: vec![DailyEntry {
///         date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
///         work_hours: Decimal::new(4, 0),
///         overtime_hours: Decimal::ZERO,
///         apply_hourly_rate: None,
///     }],
///     carry_over_hours: Some(Decimal::ZERO),
/// };
///
/// let computation = engine.compute(&input).unwrap();
/// println!("Net pay: {}", computation.totals.net_amount);
/// ```
#[derive(Debug, Clone)]
pub struct WageEngine {
    config: EngineConfig,
}

impl WageEngine {
    /// Creates an engine for the given rule set.
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Returns the rule set this engine applies.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes a payroll statement.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the period is inverted, an entry lies
    /// outside the period or is duplicated, hours or rates are negative, a
    /// day exceeds 24 payable hours, or carry-over hours are needed for a
    /// part-time employee's first week but were not supplied.
    pub fn compute(&self, input: &SettlementInput) -> EngineResult<PayrollComputation> {
        self.run(input, None)
    }

    /// Applies one edit to a previous statement and computes a fresh one.
    ///
    /// `previous` is left untouched; when the edit is invalid the error is
    /// returned and the caller keeps showing the previous statement.
    pub fn recompute(
        &self,
        previous: &PayrollComputation,
        edit: &RecordEdit,
    ) -> EngineResult<PayrollComputation> {
        let mut entries: Vec<DailyEntry> =
            previous.daily_records.iter().map(DailyRecord::to_entry).collect();

        let existing = entries.iter().position(|e| e.date == edit.date);
        let entry = match existing {
            Some(index) => &mut entries[index],
            None => {
                if !previous.period.contains_date(edit.date) {
                    return Err(EngineError::InvalidRecord {
                        date: edit.date,
                        field: "date".to_string(),
                        message: format!(
                            "outside the settlement period {} to {}",
                            previous.period.start_date, previous.period.end_date
                        ),
                    });
                }
                entries.push(DailyEntry {
                    date: edit.date,
                    work_hours: Decimal::ZERO,
                    overtime_hours: Decimal::ZERO,
                    apply_hourly_rate: None,
                });
                let last = entries.len() - 1;
                &mut entries[last]
            }
        };

        if let Some(hours) = edit.work_hours {
            entry.work_hours = hours;
        }
        if let Some(hours) = edit.overtime_hours {
            entry.overtime_hours = hours;
        }
        if edit.reset_hourly_rate {
            entry.apply_hourly_rate = None;
        }
        if let Some(rate) = edit.apply_hourly_rate {
            entry.apply_hourly_rate = Some(rate);
        }

        let input = SettlementInput {
            employee_id: previous.employee_id.clone(),
            employment_type: previous.employment_type,
            period: previous.period,
            hourly_wage: previous.hourly_wage,
            daily_entries: entries,
            carry_over_hours: previous.carry_over_hours,
        };

        self.run(&input, Some(edit))
    }

    fn run(
        &self,
        input: &SettlementInput,
        edit: Option<&RecordEdit>,
    ) -> EngineResult<PayrollComputation> {
        let start_time = Instant::now();
        let entries = validate_input(input)?;

        let withholding = self.config.withholding();
        let allowance_config = self.config.holiday_allowance();
        let rule = allowance_config.rule();

        let mut steps: Vec<AuditStep> = Vec::new();
        let mut warnings: Vec<AuditWarning> = Vec::new();
        let mut step_number: u32 = 1;

        if let Some(edit) = edit {
            steps.push(edit_step(edit, step_number));
            step_number += 1;
        }

        let mut daily_records = Vec::with_capacity(entries.len());
        let mut missing_table_reported = false;
        for entry in &entries {
            let result = calculate_daily_record(
                entry,
                input.hourly_wage,
                withholding.rate,
                step_number,
                &withholding.legal_ref,
            );
            steps.push(result.audit_step);
            step_number += 1;

            self.check_record(&result.record, &mut warnings, &mut missing_table_reported);
            daily_records.push(result.record);
        }

        let weekly_subtotals = group_by_week(&daily_records);

        let mut holiday_allowances: Vec<WeeklyHolidayAllowance> = Vec::new();
        if input.employment_type.supports_holiday_allowance() {
            for (index, bucket) in weekly_subtotals.iter().enumerate() {
                let is_first_week = index == 0 && bucket.week_start_date < input.period.start_date;
                let carry_hours = if is_first_week {
                    input
                        .carry_over_hours
                        .ok_or(EngineError::MissingCarryOver {
                            week_start: bucket.week_start_date,
                        })?
                } else {
                    Decimal::ZERO
                };

                let result = calculate_holiday_allowance(
                    bucket,
                    input.hourly_wage,
                    carry_hours,
                    is_first_week,
                    &rule,
                    withholding.rate,
                    step_number,
                    &allowance_config.legal_ref,
                );
                steps.push(result.audit_step);
                step_number += 1;
                holiday_allowances.push(result.allowance);
            }
        }

        let totals = reduce_totals(&daily_records, &holiday_allowances);
        steps.push(AuditStep {
            step_number,
            rule_id: "grand_total".to_string(),
            rule_name: "Grand Total".to_string(),
            legal_ref: withholding.legal_ref.clone(),
            input: serde_json::json!({
                "daily_records": daily_records.len(),
                "eligible_allowances": holiday_allowances.iter().filter(|a| a.is_eligible).count()
            }),
            output: serde_json::json!({
                "work_hours": totals.work_hours.normalize().to_string(),
                "overtime_hours": totals.overtime_hours.normalize().to_string(),
                "allowance_hours": totals.allowance_hours.normalize().to_string(),
                "payment_amount": totals.payment_amount.to_string(),
                "deduction_amount": totals.deduction_amount.to_string(),
                "net_amount": totals.net_amount.to_string()
            }),
            reasoning: format!(
                "Payment {} less withholding {} leaves {}",
                totals.payment_amount, totals.deduction_amount, totals.net_amount
            ),
        });

        let duration_us = start_time.elapsed().as_micros() as u64;
        tracing::debug!(
            employee_id = %input.employee_id,
            employment_type = input.employment_type.as_str(),
            records = daily_records.len(),
            weeks = weekly_subtotals.len(),
            net_amount = %totals.net_amount,
            duration_us,
            "Computed payroll statement"
        );

        Ok(PayrollComputation {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            employee_id: input.employee_id.clone(),
            employment_type: input.employment_type,
            period: input.period,
            hourly_wage: input.hourly_wage,
            carry_over_hours: input.carry_over_hours,
            daily_records,
            weekly_subtotals,
            holiday_allowances,
            totals,
            audit_trace: AuditTrace {
                steps,
                warnings,
                duration_us,
            },
        })
    }

    /// Adds warnings for rates below the statutory minimum and odd hour steps.
    fn check_record(
        &self,
        record: &DailyRecord,
        warnings: &mut Vec<AuditWarning>,
        missing_table_reported: &mut bool,
    ) {
        if record.payable_hours() > Decimal::ZERO {
            match self.config.minimum_wage_on(record.date) {
                Some(minimum) if record.apply_hourly_rate < minimum.hourly => {
                    warnings.push(AuditWarning {
                        code: "BELOW_MINIMUM_WAGE".to_string(),
                        message: format!(
                            "Rate {} on {} is below the minimum wage of {} ({})",
                            record.apply_hourly_rate.normalize(),
                            record.date,
                            minimum.hourly.normalize(),
                            minimum.legal_ref
                        ),
                        severity: "high".to_string(),
                    });
                }
                Some(_) => {}
                None if !*missing_table_reported => {
                    *missing_table_reported = true;
                    warnings.push(AuditWarning {
                        code: "MINIMUM_WAGE_UNKNOWN".to_string(),
                        message: format!("No minimum wage table covers {}", record.date),
                        severity: "medium".to_string(),
                    });
                }
                None => {}
            }
        }

        for (field, hours) in [
            ("work_hours", record.work_hours),
            ("overtime_hours", record.overtime_hours),
        ] {
            if !(hours * Decimal::from(2)).fract().is_zero() {
                warnings.push(AuditWarning {
                    code: "NON_HALF_HOUR_ENTRY".to_string(),
                    message: format!(
                        "{} of {} on {} is not a multiple of 30 minutes",
                        field,
                        hours.normalize(),
                        record.date
                    ),
                    severity: "low".to_string(),
                });
            }
        }
    }
}

/// Validates the input and returns its entries sorted by date.
fn validate_input(input: &SettlementInput) -> EngineResult<Vec<DailyEntry>> {
    input.period.validate()?;

    if input.employee_id.trim().is_empty() {
        return Err(EngineError::MissingInput {
            field: "employee_id".to_string(),
        });
    }
    if input.hourly_wage < Decimal::ZERO {
        return Err(EngineError::InvalidField {
            field: "hourly_wage".to_string(),
            message: "must not be negative".to_string(),
        });
    }
    if input.hourly_wage > MAX_HOURLY_RATE {
        return Err(EngineError::InvalidField {
            field: "hourly_wage".to_string(),
            message: format!("must not exceed {}", MAX_HOURLY_RATE),
        });
    }
    if let Some(hours) = input.carry_over_hours {
        if hours < Decimal::ZERO {
            return Err(EngineError::InvalidField {
                field: "carry_over_hours".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if hours > MAX_CARRY_OVER_HOURS {
            return Err(EngineError::InvalidField {
                field: "carry_over_hours".to_string(),
                message: format!("must not exceed {}", MAX_CARRY_OVER_HOURS),
            });
        }
    }

    let invalid = |date: NaiveDate, field: &str, message: String| EngineError::InvalidRecord {
        date,
        field: field.to_string(),
        message,
    };

    let mut seen = HashSet::new();
    for entry in &input.daily_entries {
        if !input.period.contains_date(entry.date) {
            return Err(invalid(
                entry.date,
                "date",
                format!(
                    "outside the settlement period {} to {}",
                    input.period.start_date, input.period.end_date
                ),
            ));
        }
        if !seen.insert(entry.date) {
            return Err(invalid(entry.date, "date", "duplicate entry".to_string()));
        }
        if entry.work_hours < Decimal::ZERO {
            return Err(invalid(entry.date, "work_hours", "must not be negative".to_string()));
        }
        if entry.overtime_hours < Decimal::ZERO {
            return Err(invalid(
                entry.date,
                "overtime_hours",
                "must not be negative".to_string(),
            ));
        }
        if entry.overtime_hours > MAX_DAILY_HOURS {
            return Err(invalid(
                entry.date,
                "overtime_hours",
                format!("must not exceed {} in one day", MAX_DAILY_HOURS),
            ));
        }
        if entry.work_hours > MAX_DAILY_HOURS
            || entry.work_hours + entry.overtime_hours > MAX_DAILY_HOURS
        {
            return Err(invalid(
                entry.date,
                "work_hours",
                format!(
                    "{} payable hours exceed {} in one day",
                    entry.work_hours.saturating_add(entry.overtime_hours).normalize(),
                    MAX_DAILY_HOURS
                ),
            ));
        }
        if let Some(rate) = entry.apply_hourly_rate {
            if rate < Decimal::ZERO {
                return Err(invalid(
                    entry.date,
                    "apply_hourly_rate",
                    "must not be negative".to_string(),
                ));
            }
            if rate > MAX_HOURLY_RATE {
                return Err(invalid(
                    entry.date,
                    "apply_hourly_rate",
                    format!("must not exceed {}", MAX_HOURLY_RATE),
                ));
            }
        }
    }

    let mut entries = input.daily_entries.clone();
    entries.sort_by_key(|e| e.date);
    Ok(entries)
}

fn edit_step(edit: &RecordEdit, step_number: u32) -> AuditStep {
    let value = |v: Option<Decimal>| v.map(|d| d.normalize().to_string());
    AuditStep {
        step_number,
        rule_id: "record_edit".to_string(),
        rule_name: "Record Edit".to_string(),
        legal_ref: String::new(),
        input: serde_json::json!({
            "date": edit.date.to_string(),
            "work_hours": value(edit.work_hours),
            "overtime_hours": value(edit.overtime_hours),
            "apply_hourly_rate": value(edit.apply_hourly_rate),
            "reset_hourly_rate": edit.reset_hourly_rate
        }),
        output: serde_json::Value::Null,
        reasoning: format!("User edited the record for {}", edit.date),
    }
}
