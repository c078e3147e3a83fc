//! Benchmarks for the streaming writer.
//!
//! Measures end-to-end throughput of writing batches of labeled sparse
//! vectors, which exercises the element framing, padding, and size
//! backfilling on every record.

extern crate matstream;

use criterion::{criterion_group, criterion_main, Criterion};
use matstream::{FeatureVector, MatWriter, WriterConfig};
use std::hint::black_box;

fn records(count: u32, entries: u32) -> Vec<FeatureVector> {
    (0..count)
        .map(|i| {
            let mut vector = FeatureVector::with_source(format!("doc-{i}"));
            for d in 0..entries {
                vector.push((d * 31 + i) % (1 << 22), f64::from(d) * 0.5);
            }
            vector
        })
        .collect()
}

/// Benchmark writing a thousand vectors of 64 entries each.
fn bench_write_batch(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.mat");
    let batch = records(1000, 64);

    c.bench_function("write_1000x64", |b| {
        b.iter(|| {
            let config = WriterConfig::new(22);
            let mut writer = MatWriter::create(&path, &config).unwrap();
            writer.write(black_box(&batch)).unwrap();
            writer.close().unwrap();
        });
    });
}

/// Benchmark writing many small vectors, where per-element overhead dominates.
fn bench_write_small_records(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench-small.mat");
    let batch = records(10_000, 2);

    c.bench_function("write_10000x2", |b| {
        b.iter(|| {
            let config = WriterConfig::new(22);
            let mut writer = MatWriter::create(&path, &config).unwrap();
            writer.write(black_box(&batch)).unwrap();
            writer.close().unwrap();
        });
    });
}

criterion_group!(benches, bench_write_batch, bench_write_small_records);
criterion_main!(benches);
