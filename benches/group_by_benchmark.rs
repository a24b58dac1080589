#![allow(clippy::expect_used, clippy::unwrap_used, missing_docs)]
//! Benchmark for grouping and faceting.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use facet_grid::prelude::*;

fn sample(size: usize) -> Table {
    // Deterministic keys with a handful of distinct values per column
    let keys: Vec<i64> = (0..size).map(|i| (i % 7) as i64).collect();
    let labels: Vec<String> = (0..size).map(|i| format!("s{}", (i * 31) % 5)).collect();
    let values: Vec<f64> = (0..size).map(|i| (i as f64 * 0.37).sin() * 50.0).collect();
    Table::builder()
        .add("k", keys)
        .add("s", labels)
        .add("v", values)
        .done()
        .unwrap()
}

fn group_by_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_by");

    for size in [100, 1_000, 10_000, 100_000] {
        let data = Grouping::from_table(sample(size));

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut tree = GroupTree::new();
                let grouped = group_by(&mut tree, black_box(&data), &["k", "s"]).unwrap();
                flatten(&grouped).unwrap()
            });
        });
    }

    group.finish();
}

fn facet_grid_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("facet_grid");

    for size in [1_000, 10_000, 100_000] {
        let table = sample(size);

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut plot = Plot::new(black_box(table.clone()));
                let x = FacetX(FacetCommon::new("k").split_x_scales(true));
                let y = FacetY(FacetCommon::new("s").split_y_scales(true));
                Facet::Grid { x, y }.apply(&mut plot).unwrap();
                plot.train(Axis::Y, "v").unwrap();
                plot.grid_size()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, group_by_benchmark, facet_grid_benchmark);
criterion_main!(benches);
