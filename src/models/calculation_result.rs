//! Calculation result models for the Wage Engine.
//!
//! This module contains the [`PayrollComputation`] type and its associated
//! structures that capture all outputs of a settlement-period calculation,
//! including daily records, weekly subtotals, holiday allowances, totals and
//! audit traces, plus the [`WorkTimeEditData`] draft shape handed between
//! editing screens.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{DailyRecord, EmploymentType, SettlementPeriod, WeekBucket, WeeklyHolidayAllowance};

/// Sum of all daily records and eligible holiday allowances of a period.
///
/// # Example
///
/// ```
/// use wage_engine::models::PeriodTotals;
/// use rust_decimal::Decimal;
///
/// let totals = PeriodTotals::default();
/// assert_eq!(totals.payment_amount, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PeriodTotals {
    /// Total contracted work hours.
    pub work_hours: Decimal,
    /// Total overtime hours.
    pub overtime_hours: Decimal,
    /// Total paid holiday-allowance hours.
    pub allowance_hours: Decimal,
    /// Total gross payment including allowances.
    pub payment_amount: Decimal,
    /// Total withholding including allowances.
    pub deduction_amount: Decimal,
    /// Total net payment including allowances.
    pub net_amount: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the statute or policy behind this rule.
    pub legal_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag inputs worth a second look without blocking the statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of a settlement-period calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollComputation {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The ID of the employee the calculation is for.
    pub employee_id: String,
    /// Employment arrangement the rules were applied for.
    pub employment_type: EmploymentType,
    /// The settlement period.
    pub period: SettlementPeriod,
    /// Hourly wage for the period; days without an override use it.
    pub hourly_wage: Decimal,
    /// Prior-period hours carried into the first week, if supplied.
    pub carry_over_hours: Option<Decimal>,
    /// Daily records, ascending by date.
    pub daily_records: Vec<DailyRecord>,
    /// Weekly subtotals, ascending by week start.
    pub weekly_subtotals: Vec<WeekBucket>,
    /// Holiday allowances, one per week (empty for full-time employees).
    pub holiday_allowances: Vec<WeeklyHolidayAllowance>,
    /// Grand totals.
    pub totals: PeriodTotals,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

/// Which payroll editing screen a draft belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollFeature {
    /// Part-time hourly payroll.
    PartTime,
    /// Overtime payroll for full-time employees.
    Overtime,
}

impl PayrollFeature {
    /// Returns the snake_case name used in draft keys and URLs.
    pub fn as_str(self) -> &'static str {
        match self {
            PayrollFeature::PartTime => "part_time",
            PayrollFeature::Overtime => "overtime",
        }
    }

    /// Parses the snake_case name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "part_time" => Some(PayrollFeature::PartTime),
            "overtime" => Some(PayrollFeature::Overtime),
            _ => None,
        }
    }
}

impl From<EmploymentType> for PayrollFeature {
    fn from(employment_type: EmploymentType) -> Self {
        match employment_type {
            EmploymentType::PartTime => PayrollFeature::PartTime,
            EmploymentType::FullTime => PayrollFeature::Overtime,
        }
    }
}

/// Edited work-time data handed from the detail screen back to the statement screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkTimeEditData {
    /// Screen the draft belongs to.
    pub feature: PayrollFeature,
    /// The employee the draft is for.
    pub employee_id: String,
    /// The settlement period being edited.
    pub period: SettlementPeriod,
    /// Hourly wage for the period.
    pub hourly_wage: Decimal,
    /// Prior-period hours carried into the first week.
    #[serde(default)]
    pub carry_over_hours: Option<Decimal>,
    /// Edited daily records.
    pub daily_records: Vec<DailyRecord>,
    /// Weekly subtotals.
    #[serde(default)]
    pub weekly_subtotals: Vec<WeekBucket>,
    /// Weekly holiday allowances.
    #[serde(default)]
    pub holiday_allowances: Vec<WeeklyHolidayAllowance>,
    /// Grand totals.
    pub totals: PeriodTotals,
}

impl From<&PayrollComputation> for WorkTimeEditData {
    fn from(computation: &PayrollComputation) -> Self {
        Self {
            feature: computation.employment_type.into(),
            employee_id: computation.employee_id.clone(),
            period: computation.period,
            hourly_wage: computation.hourly_wage,
            carry_over_hours: computation.carry_over_hours,
            daily_records: computation.daily_records.clone(),
            weekly_subtotals: computation.weekly_subtotals.clone(),
            holiday_allowances: computation.holiday_allowances.clone(),
            totals: computation.totals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample_period() -> SettlementPeriod {
        SettlementPeriod {
            start_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        }
    }

    fn sample_allowance() -> WeeklyHolidayAllowance {
        WeeklyHolidayAllowance {
            iso_year: 2025,
            week_number: 10,
            week_start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            week_end_date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            carry_over_hours: Decimal::ZERO,
            total_work_hours_for_week: dec("16"),
            is_eligible: true,
            allowance_hours: dec("3.2"),
            hourly_rate: dec("10000"),
            allowance_amount: dec("32000"),
            deduction_amount: dec("1056"),
            net_amount: dec("30944"),
        }
    }

    fn sample_computation() -> PayrollComputation {
        PayrollComputation {
            calculation_id: Uuid::nil(),
            timestamp: DateTime::parse_from_rfc3339("2025-04-01T09:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
            engine_version: "0.1.0".to_string(),
            employee_id: "emp_001".to_string(),
            employment_type: EmploymentType::PartTime,
            period: sample_period(),
            hourly_wage: dec("10000"),
            carry_over_hours: None,
            daily_records: vec![],
            weekly_subtotals: vec![],
            holiday_allowances: vec![sample_allowance()],
            totals: PeriodTotals::default(),
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_period_totals_serialization() {
        let totals = PeriodTotals {
            work_hours: dec("16"),
            overtime_hours: dec("0"),
            allowance_hours: dec("3.2"),
            payment_amount: dec("192000"),
            deduction_amount: dec("6336"),
            net_amount: dec("185664"),
        };

        let json = serde_json::to_string(&totals).unwrap();
        assert!(json.contains("\"work_hours\":\"16\""));
        assert!(json.contains("\"allowance_hours\":\"3.2\""));
        assert!(json.contains("\"net_amount\":\"185664\""));
    }

    #[test]
    fn test_audit_step_serialization() {
        let step = AuditStep {
            step_number: 1,
            rule_id: "daily_payment".to_string(),
            rule_name: "Daily Payment".to_string(),
            legal_ref: "Income Tax Act art. 129".to_string(),
            input: serde_json::json!({"hours": "2"}),
            output: serde_json::json!({"payment_amount": "30000"}),
            reasoning: "2 hours × 15000 = 30000".to_string(),
        };

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.contains("\"step_number\":1"));
        assert!(json.contains("\"rule_id\":\"daily_payment\""));
        assert!(json.contains("\"legal_ref\":\"Income Tax Act art. 129\""));
    }

    #[test]
    fn test_computation_serialization_shape() {
        let json = serde_json::to_string(&sample_computation()).unwrap();
        assert!(json.contains("\"calculation_id\":\"00000000-0000-0000-0000-000000000000\""));
        assert!(json.contains("\"employment_type\":\"part_time\""));
        assert!(json.contains("\"carry_over_hours\":null"));
        assert!(json.contains("\"weekly_subtotals\":["));
        assert!(json.contains("\"audit_trace\":{"));
    }

    #[test]
    fn test_feature_follows_employment_type() {
        assert_eq!(
            PayrollFeature::from(EmploymentType::PartTime),
            PayrollFeature::PartTime
        );
        assert_eq!(
            PayrollFeature::from(EmploymentType::FullTime),
            PayrollFeature::Overtime
        );
    }

    #[test]
    fn test_feature_parse() {
        assert_eq!(PayrollFeature::parse("overtime"), Some(PayrollFeature::Overtime));
        assert_eq!(PayrollFeature::parse("part_time"), Some(PayrollFeature::PartTime));
        assert_eq!(PayrollFeature::parse("bonus"), None);
    }

    #[test]
    fn test_edit_data_from_computation() {
        let computation = sample_computation();
        let draft = WorkTimeEditData::from(&computation);

        assert_eq!(draft.feature, PayrollFeature::PartTime);
        assert_eq!(draft.employee_id, "emp_001");
        assert_eq!(draft.period, sample_period());
        assert_eq!(draft.holiday_allowances.len(), 1);
    }
}
