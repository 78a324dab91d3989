//! Benchmarks for resampling, pyramid construction and GSLIB encoding.
//!
//! Run with: cargo bench --package grid-engine --bench grid_benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use grid_engine::{GridStructure, NumericGrid};
use rand::Rng;

/// Random field with roughly one cell in ten empty.
fn random_grid(size: usize) -> NumericGrid {
    let mut rng = rand::thread_rng();
    let cells = (0..size * size)
        .map(|_| (rng.gen_range(0..10) != 0).then(|| rng.gen_range(0.0..0.4)))
        .collect();
    NumericGrid::from_cells(GridStructure::simple_2d(size, size).expect("structure"), cells)
        .expect("grid")
}

// =============================================================================
// RESAMPLING BENCHMARKS
// =============================================================================

fn bench_resample(c: &mut Criterion) {
    let mut group = c.benchmark_group("resample");

    for size in [128, 512] {
        let grid = random_grid(size);
        let dest = size * 3 / 2;
        group.throughput(Throughput::Elements((dest * dest) as u64));

        group.bench_with_input(BenchmarkId::new("nearest", size), &grid, |b, grid| {
            b.iter(|| black_box(grid.nearest_neighbor_resample(dest, dest).expect("resample")));
        });

        group.bench_with_input(BenchmarkId::new("bilinear", size), &grid, |b, grid| {
            b.iter(|| black_box(grid.bilinear_resample(dest, dest).expect("resample")));
        });

        group.bench_with_input(BenchmarkId::new("spacing_1", size), &grid, |b, grid| {
            b.iter(|| black_box(grid.resample_with_spacing(1).expect("resample")));
        });
    }

    group.finish();
}

// =============================================================================
// PYRAMID BENCHMARKS
// =============================================================================

fn bench_pyramid(c: &mut Criterion) {
    let mut group = c.benchmark_group("pyramid");

    for size in [64, 256] {
        let grid = random_grid(size);
        group.throughput(Throughput::Elements((size * size) as u64));

        group.bench_with_input(BenchmarkId::new("pyr_down", size), &grid, |b, grid| {
            b.iter(|| black_box(grid.pyr_down().expect("pyr_down")));
        });

        group.bench_with_input(BenchmarkId::new("pyr_up", size), &grid, |b, grid| {
            b.iter(|| black_box(grid.pyr_up().expect("pyr_up")));
        });

        group.bench_with_input(BenchmarkId::new("full_pyramid", size), &grid, |b, grid| {
            let config = grid_engine::PyramidConfig::default();
            b.iter(|| black_box(grid.pyramid(&config).expect("pyramid")));
        });
    }

    group.finish();
}

// =============================================================================
// GSLIB BENCHMARKS
// =============================================================================

fn bench_gslib(c: &mut Criterion) {
    let mut group = c.benchmark_group("gslib");
    let grid = random_grid(256);
    group.throughput(Throughput::Elements(grid.count() as u64));

    group.bench_function("encode_256", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(grid.count() * 8);
            grid.write_gslib_to(&mut out, "bench", "code", -99.0)
                .expect("encode");
            black_box(out)
        });
    });

    let mut encoded = Vec::new();
    grid.write_gslib_to(&mut encoded, "bench", "code", -99.0)
        .expect("encode");
    group.bench_function("decode_256", |b| {
        b.iter(|| {
            let mut target = grid.light_clone();
            target
                .read_gslib_from(encoded.as_slice(), -99.0)
                .expect("decode");
            black_box(target)
        });
    });

    group.finish();
}

criterion_group!(benches, bench_resample, bench_pyramid, bench_gslib);
criterion_main!(benches);
