//! # Signer
//!
//! RSA PKCS#1 v1.5 over the SHA-256 digest of the canonical message.
//!
//! The signature never depends on the salt or on the configured digest set.

use super::canonical::canonicalize;
use super::entities::{Message, Signature};
use super::errors::AuthError;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha2::{Digest, Sha256};

/// SHA-256 of the canonical message; the value that gets signed.
pub fn signing_digest(message: &Message) -> [u8; 32] {
    Sha256::digest(canonicalize(message)).into()
}

/// Sign a message.
///
/// PKCS#1 v1.5 is deterministic: the same key and message always give the same
/// signature bytes.
pub fn sign(private_key: &RsaPrivateKey, message: &Message) -> Result<Signature, AuthError> {
    let digest = signing_digest(message);
    private_key
        .sign(Pkcs1v15Sign::new::<Sha256>(), &digest)
        .map(Signature::from_bytes)
        .map_err(|e| AuthError::SigningFailed(e.to_string()))
}
