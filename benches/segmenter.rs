//! Benchmarks the Bellman DP segmenter's O(n^2) cost across series lengths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use landtrendr_core::date_index::DateIndex;
use landtrendr_core::despike::Despiker;
use landtrendr_core::segmenter::Segmenter;
use landtrendr_core::series::DaySeries;
use landtrendr_core::Observation;

fn sawtooth_series(n: usize) -> DaySeries {
    let observations: Vec<Observation> = (0..n)
        .map(|i| {
            let val = ((i % 7) as f64) + (i as f64) * 0.1;
            Observation::new(format!("{}-12-31", 2000 + i), val)
        })
        .collect();
    let raw = DateIndex::build(&observations).expect("valid dates");
    Despiker::despike(&raw).0
}

fn bench_segmenter(c: &mut Criterion) {
    let mut group = c.benchmark_group("segmenter");
    for &n in &[16usize, 32, 64, 128] {
        let series = sawtooth_series(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &series, |b, series| {
            b.iter(|| Segmenter::segment(black_box(series), black_box(2.0)).expect("enough data"));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_segmenter);
criterion_main!(benches);
