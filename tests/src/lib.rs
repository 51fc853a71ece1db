//! # VANET Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Digest, signing, and verification throughput
//! │   └── auth.rs
//! │
//! └── integration/      # Cross-node exchanges
//!     ├── flows.rs        # Send/receive across independent nodes
//!     └── concurrency.rs  # Shared metrics under concurrent receipt
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p vanet-tests
//!
//! # By category
//! cargo test -p vanet-tests integration::flows
//! cargo test -p vanet-tests integration::concurrency
//!
//! # Benchmarks
//! cargo bench -p vanet-tests
//! ```

pub mod benchmarks;
pub mod integration;
