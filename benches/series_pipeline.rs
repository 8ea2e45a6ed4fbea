use chrono::{DateTime, TimeDelta, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use warptail_stats::{recent_series, summarize, SeriesConfig};
use warptail_types::{Route, TimeSeries};

fn now() -> DateTime<Utc> {
    DateTime::from_timestamp_millis(1_744_401_000_000).unwrap_or_default()
}

/// A route sampled every `step` seconds over the last `minutes`.
fn sampled_route(minutes: i64, step: i64, offset_ms: i64) -> Route {
    let start = now() - TimeDelta::minutes(minutes);
    let mut builder = TimeSeries::builder();
    for i in 0..(minutes * 60 / step) {
        let at = start.timestamp_millis() + i * step * 1_000 + offset_ms;
        builder = builder.point_at_millis(at, (i % 17) as f64 * 512.0, (i % 5) as f64 * 128.0);
    }
    Route {
        stats: Some(builder.total(1e9, 1e8).build()),
        ..Default::default()
    }
}

/// Benchmark the window, fill and smooth pipeline for one route
fn bench_recent_series(c: &mut Criterion) {
    let mut group = c.benchmark_group("recent_series");
    let config = SeriesConfig::default();

    // 1s samples need no filling; 5m samples are mostly synthetic points.
    for step in [1i64, 60, 300].iter() {
        let route = sampled_route(15, *step, 0);
        let points = route.stats.map(|s| s.points).unwrap_or_default();

        group.bench_with_input(BenchmarkId::from_parameter(step), &points, |b, points| {
            b.iter(|| recent_series(black_box(points), now(), &config));
        });
    }

    group.finish();
}

/// Benchmark summarizing routes sampled in lock-step vs. offset
fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");

    for routes in [1usize, 10, 50].iter() {
        let aligned: Vec<Route> = (0..*routes).map(|_| sampled_route(10, 1, 0)).collect();
        let offset: Vec<Route> = (0..*routes)
            .map(|i| sampled_route(10, 1, i as i64 * 7))
            .collect();

        group.bench_with_input(BenchmarkId::new("aligned", routes), &aligned, |b, routes| {
            b.iter(|| summarize(black_box(routes)));
        });
        group.bench_with_input(BenchmarkId::new("offset", routes), &offset, |b, routes| {
            b.iter(|| summarize(black_box(routes)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_recent_series, bench_summarize);
criterion_main!(benches);
