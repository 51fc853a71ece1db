//! # Key Store
//!
//! One RSA keypair per node, generated once at construction.
//!
//! ## Security Notes
//!
//! - Modulus is at least [`MIN_KEY_BITS`]; smaller sizes are a configuration fault
//! - The private key is only reachable from the signer; `Debug` redacts it
//! - `rsa::RsaPrivateKey` zeroizes its limbs on drop

use super::entities::{Message, PublicKey, Signature};
use super::errors::AuthError;
use super::signer;
use rand::rngs::OsRng;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rsa::RsaPrivateKey;
use std::fmt;

/// Smallest accepted RSA modulus, in bits.
pub const MIN_KEY_BITS: usize = 2048;

/// Where key generation draws its randomness from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeySource {
    /// Operating system entropy
    OsEntropy,
    /// ChaCha20 stream from a fixed seed; reproducible keys for tests and replays
    Seeded(u64),
}

impl KeySource {
    /// Source for the `index`-th node of a run.
    ///
    /// Seeded sources hand each node its own seed so no two nodes share a key.
    pub fn for_node(self, index: u64) -> KeySource {
        match self {
            KeySource::OsEntropy => KeySource::OsEntropy,
            KeySource::Seeded(seed) => KeySource::Seeded(seed.wrapping_add(index)),
        }
    }
}

/// A node's keypair.
#[derive(Clone)]
pub struct KeyStore {
    private_key: RsaPrivateKey,
    public_key: PublicKey,
}

impl KeyStore {
    /// Generate a fresh keypair.
    ///
    /// # Errors
    /// * `WeakKeySize` - `bits` is below [`MIN_KEY_BITS`]
    /// * `KeyGeneration` - the RNG or prime search failed; callers treat this as fatal
    pub fn generate(bits: usize, source: KeySource) -> Result<Self, AuthError> {
        if bits < MIN_KEY_BITS {
            return Err(AuthError::WeakKeySize {
                bits,
                minimum: MIN_KEY_BITS,
            });
        }

        let private_key = match source {
            KeySource::OsEntropy => RsaPrivateKey::new(&mut OsRng, bits),
            KeySource::Seeded(seed) => {
                RsaPrivateKey::new(&mut ChaCha20Rng::seed_from_u64(seed), bits)
            }
        }
        .map_err(|e| AuthError::KeyGeneration(e.to_string()))?;

        let public_key = PublicKey::from_rsa(&private_key.to_public_key())?;

        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Public half, safe to hand out.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Sign a message with this node's private key.
    pub fn sign(&self, message: &Message) -> Result<Signature, AuthError> {
        signer::sign(&self.private_key, message)
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .finish()
    }
}
