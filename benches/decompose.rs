//! Benchmarks for triangulation and convex decomposition.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use convex_decomp::{decompose, decompose_with, triangulate, DecomposeOptions, Point2};

/// Generates a star-shaped polygon with alternating radii.
///
/// Vertices `0..n` form the outer loop (CCW). When `hole` is set, a CW square
/// hole of half-width 0.5 around the origin follows at `n..n + 4`.
fn generate_star(n: usize, hole: bool) -> (Vec<Point2<f64>>, Vec<usize>, Vec<Vec<usize>>) {
    let mut points: Vec<Point2<f64>> = (0..n)
        .map(|i| {
            let angle = i as f64 / n as f64 * 2.0 * std::f64::consts::PI;
            let radius = if i % 2 == 0 { 4.0 } else { 2.0 };
            Point2::new(radius * angle.cos(), radius * angle.sin())
        })
        .collect();
    let outer: Vec<usize> = (0..n).collect();

    let mut holes = Vec::new();
    if hole {
        points.extend([
            Point2::new(-0.5, -0.5),
            Point2::new(-0.5, 0.5),
            Point2::new(0.5, 0.5),
            Point2::new(0.5, -0.5),
        ]);
        holes.push((n..n + 4).collect());
    }

    (points, outer, holes)
}

/// Generates an n x n grid of square holes inside a large square.
fn generate_perforated(n: usize) -> (Vec<Point2<f64>>, Vec<usize>, Vec<Vec<usize>>) {
    let size = 3.0 * n as f64 + 1.0;
    let mut points = vec![
        Point2::new(0.0, 0.0),
        Point2::new(size, 0.0),
        Point2::new(size, size),
        Point2::new(0.0, size),
    ];
    let outer = vec![0, 1, 2, 3];

    let mut holes = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let x = 3.0 * col as f64 + 1.0;
            let y = 3.0 * row as f64 + 1.0;
            let base = points.len();
            points.extend([
                Point2::new(x, y),
                Point2::new(x, y + 2.0),
                Point2::new(x + 2.0, y + 2.0),
                Point2::new(x + 2.0, y),
            ]);
            holes.push((base..base + 4).collect());
        }
    }

    (points, outer, holes)
}

fn bench_triangulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulate");

    for size in [16, 128, 1024] {
        let (points, outer, holes) = generate_star(size, false);
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("star", size), &points, |b, pts| {
            b.iter(|| triangulate(black_box(pts), black_box(&outer), black_box(&holes)))
        });
    }

    for size in [16, 128, 1024] {
        let (points, outer, holes) = generate_star(size, true);
        group.throughput(Throughput::Elements(size as u64 + 4));

        group.bench_with_input(BenchmarkId::new("star_with_hole", size), &points, |b, pts| {
            b.iter(|| triangulate(black_box(pts), black_box(&outer), black_box(&holes)))
        });
    }

    group.finish();
}

fn bench_decompose(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose");

    for size in [16, 128, 1024] {
        let (points, outer, holes) = generate_star(size, true);
        group.throughput(Throughput::Elements(size as u64 + 4));

        group.bench_with_input(BenchmarkId::new("star_with_hole", size), &points, |b, pts| {
            b.iter(|| decompose(black_box(pts), black_box(&outer), black_box(&holes)))
        });
    }

    for n in [2, 4, 8] {
        let (points, outer, holes) = generate_perforated(n);
        group.throughput(Throughput::Elements(points.len() as u64));

        group.bench_with_input(BenchmarkId::new("perforated", n * n), &points, |b, pts| {
            b.iter(|| decompose(black_box(pts), black_box(&outer), black_box(&holes)))
        });
    }

    group.finish();
}

fn bench_refine(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompose_refine");

    let size = 512;
    let (points, outer, holes) = generate_star(size, true);
    group.throughput(Throughput::Elements(size as u64 + 4));

    let plain = DecomposeOptions::default();
    let refined = DecomposeOptions::default().with_refine(true);

    group.bench_function("plain", |b| {
        b.iter(|| decompose_with(black_box(&points), &outer, &holes, black_box(&plain)))
    });

    group.bench_function("refined", |b| {
        b.iter(|| decompose_with(black_box(&points), &outer, &holes, black_box(&refined)))
    });

    group.finish();
}

criterion_group!(benches, bench_triangulate, bench_decompose, bench_refine);
criterion_main!(benches);
