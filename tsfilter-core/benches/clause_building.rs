use chrono::DateTime;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tsfilter_core::{
    clause::dimensions_part, DimensionSet, MetricFilter, Page, StatementBuilder, Statistic,
    TimeBounds,
};

fn create_dimensions(count: usize) -> DimensionSet {
    (0..count)
        .map(|i| (format!("dim_{:02}", i), format!("value-{}.example:{}", i, i % 7)))
        .collect()
}

fn bench_dimensions_part(c: &mut Criterion) {
    let mut group = c.benchmark_group("dimensions_part");

    for count in [1, 5, 20, 50] {
        let dims = create_dimensions(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &dims, |b, dims| {
            b.iter(|| dimensions_part(black_box(Some(dims))).unwrap())
        });
    }

    group.finish();
}

fn bench_statements(c: &mut Criterion) {
    let start = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z").unwrap();
    let end = DateTime::parse_from_rfc3339("2024-01-02T00:00:00Z").unwrap();
    let filter = MetricFilter::new("tenant-0001", "us-east-1")
        .with_name("cpu.idle_perc")
        .with_dimensions(create_dimensions(5))
        .with_bounds(TimeBounds::new(Some(start), Some(end)).unwrap());
    let builder = StatementBuilder::default();

    c.bench_function("measurements_statement", |b| {
        b.iter(|| builder.measurements(black_box(&filter), false, Page::limit(1000)).unwrap())
    });

    let stats = [Statistic::Avg, Statistic::Min, Statistic::Max];
    c.bench_function("statistics_statement", |b| {
        b.iter(|| {
            builder
                .statistics(black_box(&filter), &stats, Some(300), false, Page::default())
                .unwrap()
        })
    });
}

fn bench_metric_names(c: &mut Criterion) {
    let filter = MetricFilter::new("tenant-0001", "us-east-1").with_dimensions(create_dimensions(5));
    let builder = StatementBuilder::default();

    c.bench_function("metric_names_statement", |b| {
        b.iter(|| builder.metric_names(black_box(&filter), Page::limit(1000)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_dimensions_part,
    bench_statements,
    bench_metric_names
);
criterion_main!(benches);
