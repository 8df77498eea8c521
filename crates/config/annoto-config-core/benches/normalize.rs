use annoto_config::{normalize, normalize_json, RawConfig};
use annoto_test_fixtures::configs;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_fixtures(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_json");
    for name in configs::keys() {
        let value = match configs::value(&name) {
            Ok(v) => v,
            Err(err) => panic!("fixture {name}: {err:#}"),
        };
        group.bench_with_input(BenchmarkId::from_parameter(&name), &value, |b, v| {
            b.iter(|| normalize_json(black_box(v)))
        });
    }
    group.finish();
}

fn bench_raw(c: &mut Criterion) {
    let raw = RawConfig::new("bench-client", "html5");
    c.bench_function("normalize_raw_minimal", |b| {
        b.iter(|| normalize(black_box(&raw)))
    });

    let text = configs::json("full").unwrap_or_default();
    c.bench_function("normalize_str_full", |b| {
        b.iter(|| annoto_config::normalize_str(black_box(&text)))
    });
}

criterion_group!(benches, bench_fixtures, bench_raw);
criterion_main!(benches);
