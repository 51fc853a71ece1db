//! # VANET Message Authentication
//!
//! Signed, multi-hashed telemetry exchange between vehicles.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Canonical encoding, digests, keys, signing, verification
//! - **Ports Layer** (`ports/`): Inbound node API and outbound metrics sink
//! - **Service Layer** (`service.rs`): The `Node` composition root wiring domain to ports
//! - **Metrics** (`metrics.rs`): Per-simulation collector backed by a private Prometheus registry
//!
//! ## Acceptance Rule
//!
//! A message is accepted iff every configured digest matches a locally recomputed
//! digest AND the RSA PKCS#1 v1.5 signature verifies against the claimed sender key.
//! Per-message failures never propagate as errors; they become an [`AcceptDecision`].
//!
//! ## Salt
//!
//! Digest inputs are salted per sender. Receivers never need the salt on the wire:
//! both sides derive it from the network salt key and the sender id (see [`SaltScheme`]).

pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_helpers;

// Re-export public API
pub use config::{AuthConfig, SaltSchemeKind};
pub use domain::canonical::canonicalize;
pub use domain::digest::{DigestEngine, HashAlgorithm};
pub use domain::entities::{
    AcceptDecision, DigestSet, Envelope, HashTiming, Kinematics, Message, NodeId, Position,
    PublicKey, Signature,
};
pub use domain::errors::AuthError;
pub use domain::keystore::{KeySource, KeyStore, MIN_KEY_BITS};
pub use domain::salt::{Salt, SaltScheme};
pub use domain::signer::sign;
pub use domain::verifier::{verify_signature, Verifier};
pub use metrics::MetricsCollector;
pub use ports::inbound::MessageAuthApi;
pub use ports::outbound::MetricsSink;
pub use service::{Node, ProtocolContext};
