//! Grand total calculation.

use crate::models::{DailyRecord, PeriodTotals, WeeklyHolidayAllowance};

/// Sums daily records and eligible holiday allowances into period totals.
///
/// Ineligible allowances are skipped. Empty input yields all-zero totals.
pub fn reduce_totals(
    daily_records: &[DailyRecord],
    allowances: &[WeeklyHolidayAllowance],
) -> PeriodTotals {
    let mut totals = daily_records
        .iter()
        .fold(PeriodTotals::default(), |mut acc, record| {
            acc.work_hours += record.work_hours;
            acc.overtime_hours += record.overtime_hours;
            acc.payment_amount += record.payment_amount;
            acc.deduction_amount += record.deduction_amount;
            acc.net_amount += record.net_amount;
            acc
        });

    for allowance in allowances.iter().filter(|a| a.is_eligible) {
        totals.allowance_hours += allowance.allowance_hours;
        totals.payment_amount += allowance.allowance_amount;
        totals.deduction_amount += allowance.deduction_amount;
        totals.net_amount += allowance.net_amount;
    }

    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn record(day: u32, work: &str, overtime: &str, payment: &str, deduction: &str) -> DailyRecord {
        DailyRecord {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            work_hours: dec(work),
            overtime_hours: dec(overtime),
            apply_hourly_rate: dec("10000"),
            contract_hourly_rate: dec("10000"),
            payment_amount: dec(payment),
            deduction_amount: dec(deduction),
            net_amount: dec(payment) - dec(deduction),
        }
    }

    fn allowance(eligible: bool, hours: &str, amount: &str, deduction: &str) -> WeeklyHolidayAllowance {
        WeeklyHolidayAllowance {
            iso_year: 2025,
            week_number: 10,
            week_start_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            week_end_date: NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
            carry_over_hours: Decimal::ZERO,
            total_work_hours_for_week: dec("16"),
            is_eligible: eligible,
            allowance_hours: dec(hours),
            hourly_rate: dec("10000"),
            allowance_amount: dec(amount),
            deduction_amount: dec(deduction),
            net_amount: dec(amount) - dec(deduction),
        }
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(reduce_totals(&[], &[]), PeriodTotals::default());
    }

    #[test]
    fn test_sums_daily_records() {
        let records = vec![
            record(3, "8", "0", "80000", "2640"),
            record(4, "8", "2", "100000", "3300"),
        ];

        let totals = reduce_totals(&records, &[]);
        assert_eq!(totals.work_hours, dec("16"));
        assert_eq!(totals.overtime_hours, dec("2"));
        assert_eq!(totals.allowance_hours, Decimal::ZERO);
        assert_eq!(totals.payment_amount, dec("180000"));
        assert_eq!(totals.deduction_amount, dec("5940"));
        assert_eq!(totals.net_amount, dec("174060"));
    }

    #[test]
    fn test_includes_only_eligible_allowances() {
        let records = vec![record(3, "16", "0", "160000", "5280")];
        let allowances = vec![
            allowance(true, "3.2", "32000", "1056"),
            allowance(false, "0", "0", "0"),
        ];

        let totals = reduce_totals(&records, &allowances);
        assert_eq!(totals.work_hours, dec("16"));
        assert_eq!(totals.allowance_hours, dec("3.2"));
        assert_eq!(totals.payment_amount, dec("192000"));
        assert_eq!(totals.deduction_amount, dec("6336"));
        assert_eq!(totals.net_amount, dec("185664"));
    }

    #[test]
    fn test_ineligible_allowance_with_stale_amounts_is_ignored() {
        let allowances = vec![allowance(false, "3.2", "32000", "1056")];
        assert_eq!(reduce_totals(&[], &allowances), PeriodTotals::default());
    }
}
