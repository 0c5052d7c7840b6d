//! Criterion benchmarks for the hot pipeline stages

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use terradiff_algorithms::difference::{absolute_difference, structural_difference, SsimParams};
use terradiff_algorithms::regions::{extract_regions, RegionParams};
use terradiff_algorithms::segment::{segment, SegmentParams, CHANGED, UNCHANGED};
use terradiff_core::raster::Raster;

fn gradient_plane(rows: usize, cols: usize, phase: f64) -> Raster<f64> {
    let mut plane = Raster::new(rows, cols);
    for r in 0..rows {
        for c in 0..cols {
            let v = 127.0 + 120.0 * ((r + c) as f64 / 37.0 + phase).sin();
            plane.set(r, c, v).unwrap();
        }
    }
    plane
}

fn bench_difference(c: &mut Criterion) {
    let before = gradient_plane(512, 512, 0.0);
    let after = gradient_plane(512, 512, 0.35);

    c.bench_function("absolute_difference_512", |b| {
        b.iter(|| absolute_difference(black_box(&before), black_box(&after)).unwrap())
    });

    c.bench_function("ssim_512", |b| {
        b.iter(|| {
            structural_difference(black_box(&before), black_box(&after), &SsimParams::default())
                .unwrap()
        })
    });
}

fn bench_segment_and_regions(c: &mut Criterion) {
    let map = {
        let mut m = Raster::filled(512, 512, 4.0);
        for r in 100..220 {
            for c in 140..300 {
                m.set(r, c, 180.0).unwrap();
            }
        }
        m
    };

    c.bench_function("segment_512", |b| {
        b.iter(|| segment(black_box(&map), &SegmentParams::default()).unwrap())
    });

    let mask = {
        let mut m = Raster::filled(512, 512, UNCHANGED);
        for r in 100..220 {
            for c in 140..300 {
                m.set(r, c, CHANGED).unwrap();
            }
        }
        m
    };

    c.bench_function("extract_regions_512", |b| {
        b.iter(|| extract_regions(black_box(&mask), &RegionParams::default()).unwrap())
    });
}

criterion_group!(benches, bench_difference, bench_segment_and_regions);
criterion_main!(benches);
