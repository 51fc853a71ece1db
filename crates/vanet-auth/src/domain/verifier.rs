//! # Verifier
//!
//! Integrity (digest recomputation) and authenticity (signature) checks.
//!
//! ## Failure Semantics
//!
//! Nothing here returns an error. A malformed key, a truncated signature, a
//! missing digest, or a mismatch all collapse into `false` and, at the top, into
//! an [`AcceptDecision`] rejection.

use super::digest::DigestEngine;
use super::entities::{AcceptDecision, DigestSet, Message, PublicKey, Signature};
use super::salt::Salt;
use super::signer::signing_digest;
use rsa::Pkcs1v15Sign;
use sha2::Sha256;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Check a PKCS#1 v1.5 / SHA-256 signature against the claimed sender key.
pub fn verify_signature(public_key: &PublicKey, message: &Message, signature: &Signature) -> bool {
    let key = match public_key.to_rsa() {
        Ok(key) => key,
        Err(_) => return false,
    };

    key.verify(
        Pkcs1v15Sign::new::<Sha256>(),
        &signing_digest(message),
        signature.as_bytes(),
    )
    .is_ok()
}

/// Message verifier bound to the node's digest configuration.
#[derive(Clone, Debug)]
pub struct Verifier {
    engine: Arc<DigestEngine>,
}

impl Verifier {
    /// Create a verifier using the given digest engine.
    pub fn new(engine: Arc<DigestEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &DigestEngine {
        &self.engine
    }

    /// Recompute digests locally and compare every configured algorithm.
    ///
    /// An algorithm missing from `received` fails the check. Extra algorithms in
    /// `received` that this node does not compute are ignored.
    pub fn verify_integrity(&self, message: &Message, received: &DigestSet, salt: &Salt) -> bool {
        let local = self.engine.compute(message, salt);

        // Every entry is compared even after a mismatch.
        let mut all_match = true;
        for (algorithm, expected) in local.iter() {
            let matches = match received.get(algorithm) {
                Some(actual) => bool::from(expected.ct_eq(actual)),
                None => false,
            };
            all_match &= matches;
        }
        all_match
    }

    /// Verify a signature.
    pub fn verify_signature(
        &self,
        public_key: &PublicKey,
        message: &Message,
        signature: &Signature,
    ) -> bool {
        verify_signature(public_key, message, signature)
    }

    /// Run both checks and combine them.
    ///
    /// Both checks always run so the decision says exactly which ones failed.
    pub fn accept(
        &self,
        message: &Message,
        received: &DigestSet,
        signature: &Signature,
        sender_public_key: &PublicKey,
        salt: &Salt,
    ) -> AcceptDecision {
        let integrity_ok = self.verify_integrity(message, received, salt);
        let signature_ok = verify_signature(sender_public_key, message, signature);
        AcceptDecision::from_checks(integrity_ok, signature_ok)
    }
}
