//! Weekly holiday allowance calculation functionality.
//!
//! Part-time employees who work at least 15 contracted hours in a
//! Monday–Sunday week are owed a paid rest day worth one fifth of the week's
//! hours, as per Article 55 of the Labor Standards Act and Article 30 of its
//! Enforcement Decree.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AuditStep, WeekBucket, WeeklyHolidayAllowance};

use super::daily_payment::compute_daily;

/// Minimum weekly hours for the allowance to apply.
pub const DEFAULT_MIN_WEEKLY_HOURS: Decimal = Decimal::from_parts(15, 0, 0, false, 0);

/// Weekly hours are divided by this to give allowance hours.
pub const DEFAULT_ALLOWANCE_DIVISOR: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Threshold and divisor of the weekly holiday allowance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HolidayAllowanceRule {
    /// Minimum effective hours in a week for eligibility (inclusive).
    pub min_weekly_hours: Decimal,
    /// Divisor applied to effective hours.
    pub divisor: Decimal,
}

impl Default for HolidayAllowanceRule {
    fn default() -> Self {
        Self {
            min_weekly_hours: DEFAULT_MIN_WEEKLY_HOURS,
            divisor: DEFAULT_ALLOWANCE_DIVISOR,
        }
    }
}

/// The result of evaluating one week's holiday allowance, including the audit step.
#[derive(Debug, Clone)]
pub struct HolidayAllowanceResult {
    /// The allowance for the week (all zero when ineligible).
    pub allowance: WeeklyHolidayAllowance,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the holiday allowance for one week.
///
/// Effective hours are the bucket's contracted work hours plus, for the
/// first week of a period, the hours carried over from the previous period.
/// Overtime hours do not count toward the threshold.
///
/// # Arguments
///
/// * `bucket` - The week to evaluate
/// * `hourly_rate` - The rate the allowance is paid at
/// * `carry_hours` - Hours worked in the same week before the period started
/// * `is_first_week` - Whether `carry_hours` applies to this week
/// * `rule` - Threshold and divisor
/// * `withholding_rate` - Withholding applied to the allowance amount
///
/// # Examples
///
/// ```
/// use wage_engine::calculation::{
///     DEFAULT_WITHHOLDING_RATE, HolidayAllowanceRule, compute_holiday_allowance,
/// };
/// use wage_engine::models::WeekBucket;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let bucket = WeekBucket {
///     iso_year: 2025,
///     week_number: 10,
///     week_start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
///     week_end_date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
///     dates: vec![],
///     work_hours: Decimal::new(16, 0),
///     overtime_hours: Decimal::ZERO,
///     payment_amount: Decimal::new(160_000, 0),
///     deduction_amount: Decimal::new(5_280, 0),
///     net_amount: Decimal::new(154_720, 0),
/// };
///
/// let allowance = compute_holiday_allowance(
///     &bucket,
///     Decimal::new(10_000, 0),
///     Decimal::ZERO,
///     false,
///     &HolidayAllowanceRule::default(),
///     DEFAULT_WITHHOLDING_RATE,
/// );
/// assert!(allowance.is_eligible);
/// assert_eq!(allowance.allowance_hours, Decimal::new(32, 1));
/// assert_eq!(allowance.allowance_amount, Decimal::new(32_000, 0));
/// assert_eq!(allowance.net_amount, Decimal::new(30_944, 0));
/// ```
pub fn compute_holiday_allowance(
    bucket: &WeekBucket,
    hourly_rate: Decimal,
    carry_hours: Decimal,
    is_first_week: bool,
    rule: &HolidayAllowanceRule,
    withholding_rate: Decimal,
) -> WeeklyHolidayAllowance {
    let carry_over_hours = if is_first_week {
        carry_hours.max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    let effective_hours = bucket.work_hours + carry_over_hours;
    // No allowance without a positive divisor.
    let base_hours = (rule.divisor > Decimal::ZERO)
        .then(|| effective_hours.checked_div(rule.divisor))
        .flatten();
    let is_eligible = base_hours.is_some() && effective_hours >= rule.min_weekly_hours;

    let (allowance_hours, amounts) = match base_hours {
        Some(hours) if is_eligible => {
            let hours = hours
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                .normalize();
            (hours, compute_daily(hours, hourly_rate, withholding_rate))
        }
        _ => (Decimal::ZERO, Default::default()),
    };

    WeeklyHolidayAllowance {
        iso_year: bucket.iso_year,
        week_number: bucket.week_number,
        week_start_date: bucket.week_start_date,
        week_end_date: bucket.week_end_date,
        carry_over_hours,
        total_work_hours_for_week: effective_hours,
        is_eligible,
        allowance_hours,
        hourly_rate,
        allowance_amount: amounts.payment_amount,
        deduction_amount: amounts.deduction_amount,
        net_amount: amounts.net_amount,
    }
}

/// Computes the holiday allowance for one week and records an audit step.
#[allow(clippy::too_many_arguments)]
pub fn calculate_holiday_allowance(
    bucket: &WeekBucket,
    hourly_rate: Decimal,
    carry_hours: Decimal,
    is_first_week: bool,
    rule: &HolidayAllowanceRule,
    withholding_rate: Decimal,
    step_number: u32,
    legal_ref: &str,
) -> HolidayAllowanceResult {
    let allowance = compute_holiday_allowance(
        bucket,
        hourly_rate,
        carry_hours,
        is_first_week,
        rule,
        withholding_rate,
    );

    let reasoning = if allowance.is_eligible {
        format!(
            "{} effective hours >= {}: {} / {} = {} allowance hours × {} = {}",
            allowance.total_work_hours_for_week.normalize(),
            rule.min_weekly_hours.normalize(),
            allowance.total_work_hours_for_week.normalize(),
            rule.divisor.normalize(),
            allowance.allowance_hours,
            hourly_rate.normalize(),
            allowance.allowance_amount
        )
    } else if allowance.total_work_hours_for_week >= rule.min_weekly_hours {
        format!(
            "Divisor {} is not positive: not eligible",
            rule.divisor.normalize()
        )
    } else {
        format!(
            "{} effective hours < {}: not eligible",
            allowance.total_work_hours_for_week.normalize(),
            rule.min_weekly_hours.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "weekly_holiday_allowance".to_string(),
        rule_name: "Weekly Holiday Allowance".to_string(),
        legal_ref: legal_ref.to_string(),
        input: serde_json::json!({
            "week_start_date": bucket.week_start_date.to_string(),
            "week_end_date": bucket.week_end_date.to_string(),
            "work_hours": bucket.work_hours.normalize().to_string(),
            "carry_over_hours": allowance.carry_over_hours.normalize().to_string(),
            "is_first_week": is_first_week,
            "hourly_rate": hourly_rate.normalize().to_string()
        }),
        output: serde_json::json!({
            "is_eligible": allowance.is_eligible,
            "allowance_hours": allowance.allowance_hours.to_string(),
            "allowance_amount": allowance.allowance_amount.to_string(),
            "deduction_amount": allowance.deduction_amount.to_string(),
            "net_amount": allowance.net_amount.to_string()
        }),
        reasoning,
    };

    HolidayAllowanceResult {
        allowance,
        audit_step,
    }
}
