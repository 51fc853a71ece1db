//! # Integration Tests
//!
//! Exchanges between independently constructed nodes sharing one protocol
//! context, as they would in a deployed network.

pub mod concurrency;
pub mod flows;
