//! # Message Authentication Benchmarks
//!
//! Per-message costs on the send and receive paths:
//! - One digest per configured algorithm
//! - RSA-2048 PKCS#1 v1.5 signing and verification
//! - Full accept decision, single and batched

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::time::Duration;
use vanet_auth::test_helpers::{fixture_keys, sample_message, test_context, test_node};
use vanet_auth::{
    verify_signature, DigestEngine, HashAlgorithm, MessageAuthApi, MetricsCollector, Position,
};

fn bench_digests(c: &mut Criterion) {
    let mut group = c.benchmark_group("vanet-digest");
    let context = test_context();
    let message = sample_message("V1", 65.0);
    let salt = context.salt_scheme.salt_for("V1");

    for algorithm in HashAlgorithm::ALL {
        let engine = DigestEngine::new(&[algorithm]).unwrap();
        group.bench_with_input(
            BenchmarkId::new("single", algorithm.name()),
            &engine,
            |b, engine| b.iter(|| black_box(engine.compute(&message, &salt))),
        );
    }

    group.bench_function("all_algorithms", |b| {
        b.iter(|| black_box(context.engine.compute(&message, &salt)))
    });

    group.finish();
}

fn bench_signatures(c: &mut Criterion) {
    let mut group = c.benchmark_group("vanet-signature");
    group.measurement_time(Duration::from_secs(10));

    let keys = fixture_keys(0);
    let message = sample_message("V1", 65.0);
    let signature = keys.sign(&message).unwrap();

    group.bench_function("rsa2048_sign", |b| {
        b.iter(|| black_box(keys.sign(&message)))
    });

    group.bench_function("rsa2048_verify", |b| {
        b.iter(|| black_box(verify_signature(keys.public_key(), &message, &signature)))
    });

    group.finish();
}

fn bench_accept(c: &mut Criterion) {
    let mut group = c.benchmark_group("vanet-accept");
    group.measurement_time(Duration::from_secs(10));

    let metrics = Arc::new(MetricsCollector::new().unwrap());
    let sender = test_node("V1", 65.0, Position::new(0.0, 0.0), 0, Arc::clone(&metrics));
    let receiver = test_node("V2", 50.0, Position::new(10.0, 20.0), 1, Arc::clone(&metrics));
    let envelope = sender.generate_message().unwrap();

    group.bench_function("generate", |b| b.iter(|| black_box(sender.generate_message())));

    group.bench_function("receive_single", |b| {
        b.iter(|| black_box(receiver.receive_envelope(&envelope)))
    });

    for size in [10usize, 100] {
        let batch = vec![envelope.clone(); size];
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("receive_batch", size), &batch, |b, batch| {
            b.iter(|| black_box(receiver.receive_batch(batch)))
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_digests(c);
    bench_signatures(c);
    bench_accept(c);
}
