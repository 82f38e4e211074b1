//! Performance benchmarks for report normalization and classification.
//!
//! Run with: cargo bench --bench classify_benchmark

use audit_gate::model::AllowlistEntry;
use audit_gate::parsers::FormatResolver;
use audit_gate::policy::{parse_expiry, Classifier};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Map, Value};
use std::hint::black_box;

const SEVERITIES: [&str; 5] = ["info", "low", "moderate", "high", "critical"];

/// Generate a modern-shape report with `count` vulnerable packages.
fn generate_modern_report(count: usize) -> Value {
    let mut vulnerabilities = Map::new();
    for i in 0..count {
        let name = format!("package-{i}");
        vulnerabilities.insert(
            name.clone(),
            json!({
                "name": name,
                "severity": SEVERITIES[i % SEVERITIES.len()],
                "via": [
                    {
                        "source": 100_000 + i,
                        "name": name,
                        "title": format!("Advisory {i}"),
                        "url": format!("https://github.com/advisories/GHSA-{i:04}"),
                        "severity": SEVERITIES[i % SEVERITIES.len()],
                        "range": format!("<{}.0.0", i % 10 + 1)
                    },
                    format!("package-{}", (i + 1) % count)
                ]
            }),
        );
    }
    json!({
        "auditReportVersion": 2,
        "vulnerabilities": Value::Object(vulnerabilities),
        "metadata": { "vulnerabilities": { "total": count } }
    })
}

/// Allowlist covering every other advisory, half of them expired.
fn generate_allowlist(count: usize) -> Vec<AllowlistEntry> {
    (0..count)
        .step_by(2)
        .map(|i| {
            let expires = if i % 4 == 0 { "2999-01-01" } else { "2020-01-01" };
            AllowlistEntry::new(
                (100_000 + i).to_string(),
                format!("package-{i}"),
                "accepted",
            )
            .with_expires(expires)
        })
        .collect()
}

fn bench_normalize(c: &mut Criterion) {
    let resolver = FormatResolver::new().unwrap();
    let mut group = c.benchmark_group("normalize_modern");

    for size in [100, 1_000, 5_000] {
        let report = generate_modern_report(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &report, |b, report| {
            b.iter(|| {
                let _ = black_box(resolver.normalize_value(black_box(report)));
            })
        });
    }
    group.finish();
}

fn bench_classify(c: &mut Criterion) {
    let resolver = FormatResolver::new().unwrap();
    let now = parse_expiry("2024-01-01").unwrap();
    let classifier = Classifier::default();
    let mut group = c.benchmark_group("classify");

    for size in [100, 1_000] {
        let report = resolver.normalize_value(&generate_modern_report(size)).unwrap();
        let allowlist = generate_allowlist(size);
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &(report, allowlist),
            |b, (report, allowlist)| {
                b.iter(|| black_box(classifier.classify(black_box(report), allowlist, now)))
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_normalize, bench_classify);
criterion_main!(benches);
