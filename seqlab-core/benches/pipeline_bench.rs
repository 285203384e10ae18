//! Criterion benchmarks for the indicator hot paths.
//!
//! Benchmarks:
//! 1. Individual calculators (true range, Heiken-Ashi, Bollinger, TD Sequential)
//! 2. Full pipeline over cleaned and raw input

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use seqlab_core::indicators::{heiken_ashi, BollingerBands, TrueRangeBounds};
use seqlab_core::td::TdSequential;
use seqlab_core::{Bar, IndicatorPipeline, MaType, PipelineConfig, RawBar};

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar {
                index: i,
                timestamp: base_date + chrono::Duration::days(i as i64),
                open: close - 0.3,
                high: close + 1.5,
                low: close - 1.5,
                close,
            }
        })
        .collect()
}

fn make_raw_bars(n: usize) -> Vec<RawBar> {
    make_bars(n)
        .iter()
        .map(|b| {
            let mut raw = RawBar::new(b.timestamp, b.open, b.high, b.low, b.close);
            if b.index % 97 == 0 {
                raw.close = None;
            }
            raw
        })
        .collect()
}

// ── 1. Calculators ───────────────────────────────────────────────────

fn bench_calculators(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculators");

    for &bar_count in &[252, 1260, 2520] {
        let bars = make_bars(bar_count);
        let tr = TrueRangeBounds::compute(&bars);

        group.bench_with_input(BenchmarkId::new("true_range", bar_count), &bars, |b, bars| {
            b.iter(|| TrueRangeBounds::compute(black_box(bars)));
        });

        group.bench_with_input(BenchmarkId::new("heiken_ashi", bar_count), &bars, |b, bars| {
            b.iter(|| heiken_ashi(black_box(bars)));
        });

        let sma_bands = BollingerBands::new(20, MaType::Sma, vec![1.0, 2.0, 3.0]);
        group.bench_with_input(
            BenchmarkId::new("bollinger_sma_20x3", bar_count),
            &bars,
            |b, bars| {
                b.iter(|| sma_bands.compute(black_box(bars)));
            },
        );

        let ema_bands = BollingerBands::new(20, MaType::Ema, vec![2.0]);
        group.bench_with_input(
            BenchmarkId::new("bollinger_ema_20", bar_count),
            &bars,
            |b, bars| {
                b.iter(|| ema_bands.compute(black_box(bars)));
            },
        );

        let td = TdSequential::new(4, 9, 13);
        group.bench_with_input(BenchmarkId::new("td_sequential", bar_count), &bars, |b, bars| {
            b.iter(|| td.compute(black_box(bars), black_box(&tr)));
        });
    }

    group.finish();
}

// ── 2. Pipeline ──────────────────────────────────────────────────────

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let pipeline = IndicatorPipeline::new(PipelineConfig::default()).unwrap();

    for &bar_count in &[252, 1260, 2520] {
        let bars = make_bars(bar_count);
        group.bench_with_input(BenchmarkId::new("run_bars", bar_count), &bars, |b, bars| {
            b.iter(|| pipeline.run_bars(black_box(bars)));
        });

        let raw = make_raw_bars(bar_count);
        group.bench_with_input(BenchmarkId::new("run_raw", bar_count), &raw, |b, raw| {
            b.iter(|| pipeline.run(black_box(raw)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_calculators, bench_pipeline);
criterion_main!(benches);
