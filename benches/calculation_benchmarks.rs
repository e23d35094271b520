//! Performance benchmarks for the payroll engine.
//!
//! Covers the salary formula over rosters of growing size, the history
//! summaries, and a full `GET /salaries` request through the router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::sync::Arc;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use bar_payroll::api::{AppState, create_router};
use bar_payroll::calculation::{
    aggregate_by_employee, aggregate_by_period, build_history_records, calculate_payroll,
};
use bar_payroll::config::ConfigLoader;
use bar_payroll::models::{Employee, FormulaConfig, PayrollHistoryRecord, PayrollPeriod};
use bar_payroll::storage::{LocalStore, PayrollStore};

use axum::{body::Body, http::Request};
use chrono::{Months, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use tower::ServiceExt;

/// Creates a roster with a mix of regular staff and interns.
fn create_roster(size: usize) -> Vec<Employee> {
    (0..size)
        .map(|i| Employee {
            shifts: 10 + (i % 15) as u32,
            internship_shifts: if i % 4 == 0 { 3 } else { 0 },
            corkage_fee: Decimal::from(500 * (i % 5)),
            penalties: Decimal::from(100 * (i % 3)),
            bar_debt: Decimal::from(250 * (i % 2)),
            ..Employee::new(format!("emp_{:04}", i), format!("Employee {}", i))
        })
        .collect()
}

/// Creates a year of monthly history for a roster.
fn create_history(roster_size: usize) -> Vec<PayrollHistoryRecord> {
    let roster = create_roster(roster_size);
    let formula = FormulaConfig::default();
    let first_month = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();

    (0..12u32)
        .flat_map(|month| {
            let start = first_month + Months::new(month);
            let period = PayrollPeriod::month_of(start);
            let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
            build_history_records(&roster, &formula, &period, created_at)
        })
        .collect()
}

fn bench_calculate_payroll(c: &mut Criterion) {
    let formula = FormulaConfig::default();
    let mut group = c.benchmark_group("calculate_payroll");

    for size in [10usize, 100, 1000] {
        let roster = create_roster(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &roster, |b, roster| {
            b.iter(|| black_box(calculate_payroll(black_box(roster), &formula)))
        });
    }

    group.finish();
}

fn bench_history_aggregation(c: &mut Criterion) {
    let records = create_history(100);
    let mut group = c.benchmark_group("history_aggregation");
    group.throughput(Throughput::Elements(records.len() as u64));

    group.bench_function("by_employee", |b| {
        b.iter(|| black_box(aggregate_by_employee(black_box(&records))))
    });
    group.bench_function("by_period", |b| {
        b.iter(|| black_box(aggregate_by_period(black_box(&records))))
    });

    group.finish();
}

fn bench_salaries_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let dir = tempfile::tempdir().unwrap();
    let store = LocalStore::new(dir.path()).unwrap();
    store.save_employees(&create_roster(50)).unwrap();
    let router = create_router(AppState::new(ConfigLoader::default(), Arc::new(store)));

    c.bench_function("salaries_endpoint_50_employees", |b| {
        b.to_async(&rt).iter(|| async {
            let router = router.clone();
            let response = router
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/salaries")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_calculate_payroll,
    bench_history_aggregation,
    bench_salaries_endpoint,
);
criterion_main!(benches);
