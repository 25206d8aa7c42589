//! Performance benchmarks for the Wage Engine.
//!
//! Covers the engine directly and through the HTTP router:
//! - One-month part-time statement
//! - Recalculation after a single edit
//! - Batch of 100 statements through the API
//! - Scaling with the number of daily entries
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use wage_engine::api::{AppState, CalculationRequest, create_router};
use wage_engine::calculation::{RecordEdit, SettlementInput, WageEngine};
use wage_engine::config::ConfigLoader;

use axum::{body::Body, http::Request};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tower::ServiceExt;

fn load_config() -> ConfigLoader {
    ConfigLoader::load("./config/payroll").expect("Failed to load config")
}

/// Creates a March 2025 request with `entry_count` weekday entries.
fn create_request_with_entries(employee_id: &str, entry_count: usize) -> CalculationRequest {
    let entries: Vec<serde_json::Value> = (1..=31u32)
        .filter_map(|day| NaiveDate::from_ymd_opt(2025, 3, day))
        .filter(|date| chrono::Datelike::weekday(date).num_days_from_monday() < 5)
        .take(entry_count)
        .map(|date| {
            serde_json::json!({
                "date": date,
                "start_time": "10:00",
                "end_time": "14:00",
                "overtime_hours": "1"
            })
        })
        .collect();

    let request_json = serde_json::json!({
        "employee_id": employee_id,
        "employment_type": "part_time",
        "period": { "start_date": "2025-03-01", "end_date": "2025-03-31" },
        "hourly_wage": "10030",
        "daily_entries": entries,
        "carry_over_hours": "6"
    });

    serde_json::from_value(request_json).expect("Failed to create request")
}

fn post_calculate(body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/payroll/calculate")
        .header("Content-Type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

/// Benchmark: one month computed directly by the engine.
fn bench_month_statement(c: &mut Criterion) {
    let config = load_config();
    let engine = WageEngine::new(config.config());
    let input = SettlementInput::try_from(create_request_with_entries("emp_bench_001", 21))
        .expect("Failed to convert request");

    c.bench_function("month_statement", |b| {
        b.iter(|| black_box(engine.compute(black_box(&input)).unwrap()))
    });
}

/// Benchmark: recomputing after changing one day.
fn bench_recompute(c: &mut Criterion) {
    let config = load_config();
    let engine = WageEngine::new(config.config());
    let input = SettlementInput::try_from(create_request_with_entries("emp_bench_001", 21))
        .expect("Failed to convert request");
    let previous = engine.compute(&input).unwrap();
    let edit = RecordEdit {
        date: NaiveDate::from_ymd_opt(2025, 3, 12).unwrap(),
        apply_hourly_rate: Some(Decimal::new(12_000, 0)),
        ..Default::default()
    };

    c.bench_function("recompute_one_edit", |b| {
        b.iter(|| black_box(engine.recompute(black_box(&previous), black_box(&edit)).unwrap()))
    });
}

/// Benchmark: batch of 100 statements through the router.
fn bench_batch_100(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = AppState::new(load_config());

    let requests: Vec<String> = (0..100)
        .map(|i| {
            let request = create_request_with_entries(&format!("emp_batch_{:03}", i), 1 + i % 21);
            serde_json::to_string(&request).unwrap()
        })
        .collect();

    let mut group = c.benchmark_group("batch_processing");
    group.throughput(Throughput::Elements(100));

    group.bench_function("batch_100", |b| {
        b.to_async(&rt).iter(|| async {
            let mut results = Vec::with_capacity(100);
            for body in &requests {
                let router = create_router(state.clone());
                let response = router.oneshot(post_calculate(body.clone())).await.unwrap();
                results.push(response);
            }
            black_box(results)
        })
    });

    group.finish();
}

/// Benchmark: various entry counts to understand scaling behavior.
fn bench_scaling(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let state = AppState::new(load_config());

    let mut group = c.benchmark_group("scaling");

    for entry_count in [1, 5, 10, 21].iter() {
        let router = create_router(state.clone());
        let request = create_request_with_entries("emp_bench_001", *entry_count);
        let body = serde_json::to_string(&request).unwrap();

        group.throughput(Throughput::Elements(*entry_count as u64));
        group.bench_with_input(
            BenchmarkId::new("entries", entry_count),
            entry_count,
            |b, _| {
                b.to_async(&rt).iter(|| async {
                    let router = router.clone();
                    let response = router.oneshot(post_calculate(body.clone())).await.unwrap();
                    black_box(response)
                })
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_month_statement,
    bench_recompute,
    bench_batch_100,
    bench_scaling,
);
criterion_main!(benches);
