//! Protocol configuration from environment variables.

use crate::domain::digest::HashAlgorithm;
use crate::domain::errors::AuthError;
use crate::domain::keystore::MIN_KEY_BITS;
use crate::domain::salt::SaltScheme;
use rand::RngCore;
use std::env;

/// Which [`SaltScheme`] to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaltSchemeKind {
    SenderDerived,
    Shared,
}

/// Configuration for the authentication protocol.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Digest algorithm names (validated when the digest engine is built)
    pub algorithms: Vec<String>,

    /// RSA modulus size in bits
    pub key_bits: usize,

    /// How receivers reproduce a sender's salt
    pub salt_scheme: SaltSchemeKind,

    /// Network salt key (derived scheme) or the salt itself (shared scheme).
    /// Random per run when unset.
    pub salt_key: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            algorithms: HashAlgorithm::ALL
                .iter()
                .map(|a| a.name().to_string())
                .collect(),
            key_bits: MIN_KEY_BITS,
            salt_scheme: SaltSchemeKind::SenderDerived,
            salt_key: None,
        }
    }
}

impl AuthConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `VANET_HASH_ALGORITHMS`: comma-separated names (default: all five)
    /// - `VANET_KEY_BITS`: RSA modulus size (default: 2048)
    /// - `VANET_SALT_SCHEME`: `derived` or `shared` (default: derived)
    /// - `VANET_SALT_KEY`: network salt key / shared salt (default: random per run)
    ///
    /// Algorithm names are not checked here; [`validate`](Self::validate) does that.
    pub fn from_env() -> Result<Self, AuthError> {
        let mut config = Self::default();

        if let Ok(list) = env::var("VANET_HASH_ALGORITHMS") {
            config.algorithms = list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }

        if let Ok(bits) = env::var("VANET_KEY_BITS") {
            config.key_bits = bits
                .trim()
                .parse()
                .map_err(|_| AuthError::InvalidConfig(format!("invalid VANET_KEY_BITS: {bits}")))?;
        }

        if let Ok(scheme) = env::var("VANET_SALT_SCHEME") {
            config.salt_scheme = match scheme.trim().to_ascii_lowercase().as_str() {
                "derived" | "sender" | "sender-derived" => SaltSchemeKind::SenderDerived,
                "shared" => SaltSchemeKind::Shared,
                other => {
                    return Err(AuthError::InvalidSalt(format!(
                        "unknown salt scheme: {other}"
                    )))
                }
            };
        }

        config.salt_key = env::var("VANET_SALT_KEY").ok().filter(|k| !k.is_empty());

        Ok(config)
    }

    /// Reject unusable settings before any node is built.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.algorithms.is_empty() {
            return Err(AuthError::EmptyAlgorithmSet);
        }
        for name in &self.algorithms {
            name.parse::<HashAlgorithm>()?;
        }
        if self.key_bits < MIN_KEY_BITS {
            return Err(AuthError::WeakKeySize {
                bits: self.key_bits,
                minimum: MIN_KEY_BITS,
            });
        }
        Ok(())
    }

    /// Build the salt scheme, drawing a random key when none is configured.
    pub fn salt_scheme(&self) -> Result<SaltScheme, AuthError> {
        let key = match &self.salt_key {
            Some(key) => key.clone(),
            None => {
                let mut bytes = [0u8; 16];
                rand::thread_rng().fill_bytes(&mut bytes);
                format!("vanet{}", hex::encode(bytes))
            }
        };

        match self.salt_scheme {
            SaltSchemeKind::SenderDerived => SaltScheme::sender_derived(key.into_bytes()),
            SaltSchemeKind::Shared => SaltScheme::shared(key),
        }
    }
}
