//! Indicator kernel benchmarks

use alpha_desk::indicators::{percentile, pct_changes, rsi_series, sma, std_dev};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn year_of_closes() -> Vec<f64> {
    (0..252)
        .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + i as f64 * 0.05)
        .collect()
}

fn bench_rsi(c: &mut Criterion) {
    let closes = year_of_closes();
    c.bench_function("rsi_series_252", |b| {
        b.iter(|| rsi_series(black_box(&closes), black_box(14)))
    });
}

fn bench_sma(c: &mut Criterion) {
    let closes = year_of_closes();
    c.bench_function("sma_20_252", |b| {
        b.iter(|| sma(black_box(&closes), black_box(20)))
    });
}

fn bench_var_pipeline(c: &mut Criterion) {
    let closes = year_of_closes();
    c.bench_function("returns_std_percentile_252", |b| {
        b.iter(|| {
            let returns = pct_changes(black_box(&closes));
            let vol = std_dev(&returns);
            let p5 = percentile(&returns, 5.0);
            (vol, p5)
        })
    });
}

criterion_group!(benches, bench_rsi, bench_sma, bench_var_pipeline);
criterion_main!(benches);
