//! # VANET Benchmarks
//!
//! Throughput of the per-message work: digests, signing, and verification.

pub mod auth;
