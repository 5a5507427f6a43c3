use std::collections::HashMap;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use b3_propagation::hex::parse_lower_hex;
use b3_propagation::{B3Propagation, MutableTraceContext, TraceContext};

fn fixture_context() -> TraceContext {
    TraceContext::new(
        parse_lower_hex("67891233abcdef01").expect("valid hex"),
        parse_lower_hex("2345678912345678").expect("valid hex"),
        parse_lower_hex("463ac35c9f6413ad").expect("valid hex"),
        None,
        Some(true),
        false,
    )
    .expect("valid context")
}

fn incoming() -> HashMap<String, String> {
    let mut carrier = HashMap::new();
    B3Propagation::new()
        .injector()
        .inject(&fixture_context(), &mut carrier);
    carrier
}

fn incoming_not_sampled() -> HashMap<String, String> {
    HashMap::from([("x-b3-sampled".to_string(), "0".to_string())])
}

fn incoming_malformed() -> HashMap<String, String> {
    HashMap::from([
        (
            "x-amzn-trace-id".to_string(),
            "Sampled=-;Parent=463ac35%Af6413ad;Root=1-??-abc!#%0123456789123456".to_string(),
        ),
        (
            "x-b3-traceid".to_string(),
            "463ac35c9f6413ad48485a3953bb6124".to_string(),
        ),
        ("x-b3-spanid".to_string(), "48485a3953bb6124".to_string()),
        ("x-b3-parentspanid".to_string(), "-".to_string()),
    ])
}

fn nothing_incoming() -> HashMap<String, String> {
    HashMap::new()
}

fn benchmark_inject(c: &mut Criterion) {
    let injector = B3Propagation::new().injector();
    let context = fixture_context();

    c.bench_function("B3Injector::inject", |b| {
        b.iter(|| {
            let mut carrier = HashMap::new();
            injector.inject(black_box(&context), &mut carrier);
            carrier
        });
    });
}

fn benchmark_extract(c: &mut Criterion) {
    let extractor = B3Propagation::new().extractor();
    let mut group = c.benchmark_group("B3Extractor::extract");

    let fixtures = [
        ("full", incoming()),
        ("nothing", nothing_incoming()),
        ("unsampled", incoming_not_sampled()),
        ("malformed", incoming_malformed()),
    ];

    for (name, carrier) in &fixtures {
        group.bench_with_input(BenchmarkId::from_parameter(name), carrier, |b, carrier| {
            b.iter(|| extractor.extract(black_box(carrier)));
        });
    }

    group.finish();
}

fn benchmark_extract_into(c: &mut Criterion) {
    let extractor = B3Propagation::new().extractor();
    let mut group = c.benchmark_group("B3Extractor::extract_into");

    let fixtures = [
        ("full", incoming()),
        ("nothing", nothing_incoming()),
        ("unsampled", incoming_not_sampled()),
        ("malformed", incoming_malformed()),
    ];

    for (name, carrier) in &fixtures {
        group.bench_with_input(BenchmarkId::from_parameter(name), carrier, |b, carrier| {
            let mut holder = MutableTraceContext::new();
            b.iter(|| extractor.extract_into(black_box(carrier), &mut holder));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_inject,
    benchmark_extract,
    benchmark_extract_into
);
criterion_main!(benches);
