//! # Salt Schemes
//!
//! The salt mixed into every digest input.
//!
//! The salt never travels with a message. A receiver must therefore be able to
//! reproduce the salt the sender used, so it is derived from network-wide
//! material:
//!
//! - [`SaltScheme::SenderDerived`]: `hex(SHA-256(network_key || 0x00 || sender_id))`.
//!   Each sender gets a distinct salt; every node holding the network key can
//!   recompute it for any claimed sender.
//! - [`SaltScheme::Shared`]: one fixed salt for the whole network.

use super::errors::AuthError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Salt bytes appended to the canonical message before hashing.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Salt(String);

impl Salt {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // salts are derived from the network key; only show a prefix
        let prefix: String = self.0.chars().take(8).collect();
        write!(f, "Salt({prefix}..)")
    }
}

/// How nodes agree on the salt for a given sender.
#[derive(Clone, PartialEq, Eq)]
pub enum SaltScheme {
    /// Per-sender salt derived from a network key and the sender id
    SenderDerived { network_key: Vec<u8> },
    /// One salt for every sender
    Shared(Salt),
}

impl SaltScheme {
    /// Per-sender derivation from a non-empty network key.
    pub fn sender_derived(network_key: impl Into<Vec<u8>>) -> Result<Self, AuthError> {
        let network_key = network_key.into();
        if network_key.is_empty() {
            return Err(AuthError::InvalidSalt("empty network salt key".into()));
        }
        Ok(SaltScheme::SenderDerived { network_key })
    }

    /// A single non-empty salt for the whole network.
    pub fn shared(salt: impl Into<String>) -> Result<Self, AuthError> {
        let salt = salt.into();
        if salt.is_empty() {
            return Err(AuthError::InvalidSalt("empty shared salt".into()));
        }
        Ok(SaltScheme::Shared(Salt(salt)))
    }

    /// Salt used by (and expected from) `sender_id`.
    pub fn salt_for(&self, sender_id: &str) -> Salt {
        match self {
            SaltScheme::SenderDerived { network_key } => {
                let mut hasher = Sha256::new();
                hasher.update(network_key);
                hasher.update([0u8]);
                hasher.update(sender_id.as_bytes());
                Salt(hex::encode(hasher.finalize()))
            }
            SaltScheme::Shared(salt) => salt.clone(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SaltScheme::SenderDerived { .. } => "derived",
            SaltScheme::Shared(_) => "shared",
        }
    }
}

impl fmt::Debug for SaltScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaltScheme")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}
