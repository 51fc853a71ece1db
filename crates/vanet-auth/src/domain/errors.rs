//! # Authentication Errors
//!
//! Error types for key management, digesting, and envelope handling.
//!
//! Signature and digest mismatches are NOT errors: they are reported as an
//! [`AcceptDecision`](super::entities::AcceptDecision). Everything in this enum is
//! either a configuration fault (fatal at startup), a resource fault (fatal), or a
//! transport fault on a single envelope.

use thiserror::Error;

/// Errors that can occur in the authentication core.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// A configured hash algorithm name is not in the supported set
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// The configured hash algorithm list is empty
    #[error("No hash algorithms configured")]
    EmptyAlgorithmSet,

    /// The configured RSA modulus is below the minimum
    #[error("RSA key size {bits} is below the minimum of {minimum} bits")]
    WeakKeySize { bits: usize, minimum: usize },

    /// Key generation failed (entropy or resource exhaustion)
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Public key bytes could not be encoded or decoded
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// The private key refused to produce a signature
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Message fields violate construction rules
    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    /// A configuration value could not be parsed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Salt scheme configuration is unusable
    #[error("Invalid salt configuration: {0}")]
    InvalidSalt(String),

    /// Envelope bytes could not be encoded or decoded
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Metric registration failed
    #[error("Metrics registration failed: {0}")]
    Metrics(String),
}

impl From<prometheus::Error> for AuthError {
    fn from(err: prometheus::Error) -> Self {
        AuthError::Metrics(err.to_string())
    }
}
