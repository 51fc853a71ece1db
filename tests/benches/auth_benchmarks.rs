//! # VANET Authentication Benchmarks
//!
//! | Path | Operation |
//! |------|-----------|
//! | send | digest set over all algorithms, RSA-2048 signature |
//! | receive | digest recomputation, signature verification, accept decision |
//! | receive | parallel batch verification |

use criterion::{criterion_group, criterion_main, Criterion};
use vanet_tests::benchmarks::auth::register_benchmarks;

fn auth_benchmarks(c: &mut Criterion) {
    register_benchmarks(c);
}

criterion_group!(benches, auth_benchmarks);
criterion_main!(benches);
