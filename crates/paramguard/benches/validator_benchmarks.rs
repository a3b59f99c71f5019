//! Validation and drift benchmarks.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use paramguard::drift::{is_effectively_null, sample_values, validation_type_label};
use paramguard::{Value, ValidatorRegistry, validate_parameter};

/// Representative event parameters and raw values.
fn samples() -> Vec<(&'static str, Value)> {
    vec![
        ("user_id", Value::Int(889_120_331)),
        ("is_payer", Value::from("True")),
        ("interrupted", Value::Float(1.0)),
        ("dice_multiplier", Value::Float(10.0)),
        ("platform", Value::from("Android")),
        ("os_version", Value::from("Android OS 14 / API-34")),
        ("transaction_id", Value::from("GPA.3312-5521-0981-44271")),
        ("client_version_hash", Value::from("9e107d9d372bb6826bd81d3542a419d6")),
        ("stickers_state", Value::from("12/180")),
        ("event_timestamp", Value::from("2024-06-09T08:00:00Z")),
        (
            "presented_offers",
            Value::from(
                r#"[{"sku": "com.game.dice_pack_1", "original_price": 4.99, "currency": "USD", "type": "Paid"}]"#,
            ),
        ),
        (
            "click_on_screen",
            Value::from(r#"{"x": 120, "y": 44.5, "screen": "board"}"#),
        ),
        ("not_registered", Value::from("anything")),
    ]
}

fn bench_validate_parameter(c: &mut Criterion) {
    // Build the registry outside the measurement.
    let _ = ValidatorRegistry::global();

    let mut group = c.benchmark_group("validate_parameter");
    for (name, value) in samples() {
        group.bench_with_input(BenchmarkId::from_parameter(name), &value, |b, value| {
            b.iter(|| validate_parameter(black_box(name), black_box(value)))
        });
    }
    group.finish();
}

fn bench_registry_build(c: &mut Criterion) {
    c.bench_function("registry_build", |b| {
        b.iter(|| {
            ValidatorRegistry::with_clock(std::sync::Arc::new(paramguard::SystemClock))
                .map(|r| r.len())
        })
    });
}

fn bench_column_helpers(c: &mut Criterion) {
    let mut group = c.benchmark_group("column_helpers");

    for size in [100usize, 10_000] {
        let zeros: Vec<Value> = (0..size)
            .map(|i| if i % 3 == 0 { Value::Null } else { Value::from("0") })
            .collect();
        let ids: Vec<Value> = (0..size)
            .map(|i| Value::from(format!("{}", 100_000_000 + i)))
            .collect();

        group.bench_with_input(BenchmarkId::new("is_effectively_null", size), &zeros, |b, col| {
            b.iter(|| is_effectively_null(black_box(col)))
        });
        group.bench_with_input(BenchmarkId::new("sample_values", size), &ids, |b, col| {
            b.iter(|| sample_values(black_box(col), 3))
        });
        group.bench_with_input(BenchmarkId::new("validation_type_label", size), &ids, |b, col| {
            b.iter(|| validation_type_label(black_box(col)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_validate_parameter,
    bench_registry_build,
    bench_column_helpers
);
criterion_main!(benches);
