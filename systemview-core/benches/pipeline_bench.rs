//! Criterion benchmarks for the core pipeline.
//!
//! Benchmarks:
//! 1. SMA compute over a long daily series
//! 2. Turning-point signal generation
//! 3. Full simulation (trade extraction, path metrics, equity curve)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use systemview_core::domain::Bar;
use systemview_core::engine::simulate;
use systemview_core::indicators::{Indicator, Sma};
use systemview_core::signals::{SignalGenerator, TurningPoint};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(1960, 1, 4).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0 + i as f64 * 0.01;
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn bench_sma(c: &mut Criterion) {
    let mut group = c.benchmark_group("sma");
    for n in [2_520usize, 15_000] {
        let bars = make_bars(n);
        let sma = Sma::new(21).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &bars, |b, bars| {
            b.iter(|| sma.compute(black_box(bars)))
        });
    }
    group.finish();
}

fn bench_signals(c: &mut Criterion) {
    let bars = make_bars(15_000);
    let indicator = Sma::new(21).unwrap().compute(&bars).unwrap();
    let tp = TurningPoint::new(21);
    c.bench_function("turning_point_15000", |b| {
        b.iter(|| tp.generate(black_box(&indicator)))
    });
}

fn bench_simulate(c: &mut Criterion) {
    let bars = make_bars(15_000);
    let indicator = Sma::new(21).unwrap().compute(&bars).unwrap();
    let signals = TurningPoint::new(21).generate(&indicator);
    c.bench_function("simulate_15000", |b| {
        b.iter(|| simulate(black_box(&bars), black_box(&signals)))
    });
}

criterion_group!(benches, bench_sma, bench_signals, bench_simulate);
criterion_main!(benches);
