//! Benchmarks for the compression engine
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use historian_compression::*;

fn create_test_points(count: usize) -> Vec<Point> {
    // Slow sine with a little ripple, sampled once a second
    (0..count)
        .map(|i| {
            let t = i as f64;
            Point::new(t, (t * 0.01).sin() * 50.0 + (t * 1.3).sin() * 0.2)
        })
        .collect()
}

fn bench_algorithms(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");

    for size in [1_000, 10_000, 100_000] {
        let points = create_test_points(size);
        group.throughput(Throughput::Elements(size as u64));

        for algorithm in Algorithm::all() {
            group.bench_function(format!("{}_{}", algorithm, size), |b| {
                b.iter(|| {
                    compress(
                        *algorithm,
                        CompressionConfig::new(0.5),
                        black_box(points.iter().copied()),
                    )
                    .unwrap()
                })
            });
        }
    }

    group.finish();
}

fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    let points = create_test_points(10_000);
    group.throughput(Throughput::Elements(points.len() as u64));

    group.bench_function("feed_swinging_door_max_interval", |b| {
        b.iter(|| {
            let config = CompressionConfig::new(0.5).max_interval(60.0);
            let mut session = Session::new(Algorithm::SwingingDoor, config).unwrap();
            let mut archived = 0;
            for point in &points {
                archived += session.feed(black_box(*point)).unwrap().len();
            }
            archived + session.finish().len()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_algorithms, bench_session);
criterion_main!(benches);
