//! Criterion benchmarks for folio_projection.
//!
//! Benchmarks cover:
//! - Band projection at varying path counts
//! - Serial against rayon-sharded path simulation
//! - Path statistics over a stressed run

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use folio_projection::mc::{GbmParams, PathStatistics, PortfolioValueProjector, ProjectionConfig};

fn projector(paths: usize, parallel_threshold: usize) -> PortfolioValueProjector {
    PortfolioValueProjector::new(
        ProjectionConfig::builder()
            .path_count(paths)
            .parallel_threshold(parallel_threshold)
            .build()
            .expect("valid config"),
    )
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project_band");
    let params = GbmParams::daily(100_000.0, 0.0003, 0.015);

    for paths in [1_000usize, 5_000, 20_000] {
        let proj = projector(paths, 256);
        group.bench_with_input(BenchmarkId::new("paths", paths), &proj, |b, proj| {
            b.iter(|| proj.project(black_box(params), 252))
        });
    }
    group.finish();
}

fn bench_sharding(c: &mut Criterion) {
    let mut group = c.benchmark_group("simulate_paths");
    group.sample_size(30);
    let params = GbmParams::daily(100_000.0, 0.0003, 0.015);

    let serial = projector(10_000, usize::MAX);
    let parallel = projector(10_000, 1);
    group.bench_function("serial", |b| {
        b.iter(|| serial.simulate_paths(black_box(params), 252))
    });
    group.bench_function("rayon", |b| {
        b.iter(|| parallel.simulate_paths(black_box(params), 252))
    });
    group.finish();
}

fn bench_statistics(c: &mut Criterion) {
    let params = GbmParams::annual(1_000_000.0, -0.12, 0.1275);
    let paths = projector(5_000, 256).simulate_paths(params, 365);

    c.bench_function("path_statistics", |b| {
        b.iter(|| PathStatistics::compute(black_box(&paths), 1_000_000.0))
    });
}

criterion_group!(benches, bench_project, bench_sharding, bench_statistics);
criterion_main!(benches);
