//! Weekly aggregation functionality.
//!
//! Groups daily records into Monday–Sunday buckets keyed by ISO-8601 week.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{DailyRecord, WeekBucket};

use super::time_utils::{iso_week_number, week_bounds};

/// Groups daily records into ISO weeks.
///
/// Every record lands in exactly one bucket. Buckets are returned ascending
/// by week start date and list their member dates in ascending order.
///
/// # Examples
///
/// ```
/// use wage_engine::calculation::group_by_week;
/// use wage_engine::models::DailyRecord;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let record = |day| DailyRecord {
///     date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
///     work_hours: Decimal::new(4, 0),
///     overtime_hours: Decimal::ZERO,
///     apply_hourly_rate: Decimal::new(10_000, 0),
///     contract_hourly_rate: Decimal::new(10_000, 0),
///     payment_amount: Decimal::new(40_000, 0),
///     deduction_amount: Decimal::new(1_320, 0),
///     net_amount: Decimal::new(38_680, 0),
/// };
///
/// // Sunday 2025-03-09 and Monday 2025-03-10 fall in different weeks.
/// let weeks = group_by_week(&[record(10), record(9)]);
/// assert_eq!(weeks.len(), 2);
/// assert_eq!(weeks[0].week_number, 10);
/// assert_eq!(weeks[1].week_number, 11);
/// ```
pub fn group_by_week(records: &[DailyRecord]) -> Vec<WeekBucket> {
    let mut buckets: BTreeMap<NaiveDate, WeekBucket> = BTreeMap::new();

    for record in records {
        let (monday, sunday) = week_bounds(record.date);
        let bucket = buckets.entry(monday).or_insert_with(|| {
            let (iso_year, week_number) = iso_week_number(monday);
            WeekBucket {
                iso_year,
                week_number,
                week_start_date: monday,
                week_end_date: sunday,
                dates: Vec::new(),
                work_hours: Decimal::ZERO,
                overtime_hours: Decimal::ZERO,
                payment_amount: Decimal::ZERO,
                deduction_amount: Decimal::ZERO,
                net_amount: Decimal::ZERO,
            }
        });

        bucket.dates.push(record.date);
        bucket.work_hours += record.work_hours;
        bucket.overtime_hours += record.overtime_hours;
        bucket.payment_amount += record.payment_amount;
        bucket.deduction_amount += record.deduction_amount;
        bucket.net_amount += record.net_amount;
    }

    buckets
        .into_values()
        .map(|mut bucket| {
            bucket.dates.sort();
            bucket
        })
        .collect()
}
