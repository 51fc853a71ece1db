//! # Domain Layer
//!
//! Pure protocol logic with no I/O dependencies.
//! This is the inner layer of the hexagonal architecture.

pub mod canonical;
pub mod digest;
pub mod entities;
pub mod errors;
pub mod keystore;
pub mod salt;
pub mod signer;
pub mod verifier;
