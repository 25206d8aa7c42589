//! Daily payment calculation functionality.
//!
//! This module turns one day's hours and hourly rate into a gross payment,
//! the 3.3% business-income withholding, and the net payment.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AuditStep, DailyAmounts, DailyEntry, DailyRecord};

/// Default withholding rate: 3% income tax plus 0.3% local income tax.
pub const DEFAULT_WITHHOLDING_RATE: Decimal = Decimal::from_parts(33, 0, 0, false, 3);

/// Rounds a monetary amount half-up to the whole currency unit.
pub fn round_currency(value: Decimal) -> Decimal {
    value
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// Computes payment, withholding and net for `hours` at `apply_rate`.
///
/// - `payment = round(hours × apply_rate)`
/// - `deduction = round(payment × withholding_rate)`
/// - `net = payment − deduction`
///
/// Callers clamp inputs to non-negative values before calling.
///
/// # Examples
///
/// ```
/// use wage_engine::calculation::{compute_daily, DEFAULT_WITHHOLDING_RATE};
/// use rust_decimal::Decimal;
///
/// let amounts = compute_daily(Decimal::new(2, 0), Decimal::new(15_000, 0), DEFAULT_WITHHOLDING_RATE);
/// assert_eq!(amounts.payment_amount, Decimal::new(30_000, 0));
/// assert_eq!(amounts.deduction_amount, Decimal::new(990, 0));
/// assert_eq!(amounts.net_amount, Decimal::new(29_010, 0));
/// ```
pub fn compute_daily(hours: Decimal, apply_rate: Decimal, withholding_rate: Decimal) -> DailyAmounts {
    let payment_amount = round_currency(hours * apply_rate);
    let deduction_amount = round_currency(payment_amount * withholding_rate);
    DailyAmounts {
        payment_amount,
        deduction_amount,
        net_amount: payment_amount - deduction_amount,
    }
}

/// The result of computing one daily record, including the audit step.
#[derive(Debug, Clone)]
pub struct DailyRecordResult {
    /// The record with derived figures filled in.
    pub record: DailyRecord,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Builds a [`DailyRecord`] from an entry.
///
/// The entry's rate override is applied when present; otherwise the period
/// wage is used. The contract rate is kept as the read-only baseline.
pub fn calculate_daily_record(
    entry: &DailyEntry,
    period_wage: Decimal,
    withholding_rate: Decimal,
    step_number: u32,
    legal_ref: &str,
) -> DailyRecordResult {
    let apply_rate = entry.apply_hourly_rate.unwrap_or(period_wage);
    let hours = entry.work_hours + entry.overtime_hours;
    let amounts = compute_daily(hours, apply_rate, withholding_rate);

    let rate_source = if entry.apply_hourly_rate.is_some() {
        "user_override"
    } else {
        "period_wage"
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "daily_payment".to_string(),
        rule_name: "Daily Payment".to_string(),
        legal_ref: legal_ref.to_string(),
        input: serde_json::json!({
            "date": entry.date.to_string(),
            "work_hours": entry.work_hours.normalize().to_string(),
            "overtime_hours": entry.overtime_hours.normalize().to_string(),
            "apply_hourly_rate": apply_rate.normalize().to_string(),
            "rate_source": rate_source
        }),
        output: serde_json::json!({
            "payment_amount": amounts.payment_amount.to_string(),
            "deduction_amount": amounts.deduction_amount.to_string(),
            "net_amount": amounts.net_amount.to_string()
        }),
        reasoning: format!(
            "{} hours × {} = {}; withholding {} at {}% leaves {}",
            hours.normalize(),
            apply_rate.normalize(),
            amounts.payment_amount,
            amounts.deduction_amount,
            (withholding_rate * Decimal::from(100)).normalize(),
            amounts.net_amount
        ),
    };

    DailyRecordResult {
        record: DailyRecord {
            date: entry.date,
            work_hours: entry.work_hours,
            overtime_hours: entry.overtime_hours,
            apply_hourly_rate: apply_rate,
            contract_hourly_rate: period_wage,
            payment_amount: amounts.payment_amount,
            deduction_amount: amounts.deduction_amount,
            net_amount: amounts.net_amount,
        },
        audit_step,
    }
}
