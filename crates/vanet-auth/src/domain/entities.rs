//! # Domain Entities
//!
//! Core data structures exchanged between vehicles.

use super::digest::HashAlgorithm;
use super::errors::AuthError;
use rsa::pkcs1::{DecodeRsaPublicKey, EncodeRsaPublicKey};
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

/// Vehicle identifier (e.g. "V1").
pub type NodeId = String;

/// Longest sender id accepted into a message.
pub const MAX_SENDER_ID_LEN: usize = 256;

// =============================================================================
// Telemetry
// =============================================================================

/// Planar position of a vehicle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Current speed and position of a vehicle, supplied by the mobility collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Kinematics {
    pub speed: f64,
    pub position: Position,
}

impl Kinematics {
    pub fn new(speed: f64, position: Position) -> Self {
        Self { speed, position }
    }
}

/// A signed telemetry message.
///
/// Immutable once built. A tampered copy is a new value produced by
/// [`Message::with_speed`] or [`Message::with_position`], never an in-place edit.
///
/// Decoding goes through [`Message::new`], so a payload carrying an invalid
/// message fails to decode instead of reaching verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMessage")]
pub struct Message {
    sender_id: NodeId,
    speed: f64,
    position: Position,
}

/// Unchecked wire form of [`Message`].
#[derive(Deserialize)]
struct RawMessage {
    sender_id: NodeId,
    speed: f64,
    position: Position,
}

impl TryFrom<RawMessage> for Message {
    type Error = AuthError;

    fn try_from(raw: RawMessage) -> Result<Self, Self::Error> {
        Message::new(raw.sender_id, raw.speed, raw.position)
    }
}

impl Message {
    /// Build a message, rejecting empty/oversized ids and non-finite numbers.
    pub fn new(
        sender_id: impl Into<NodeId>,
        speed: f64,
        position: Position,
    ) -> Result<Self, AuthError> {
        let sender_id = sender_id.into();

        if sender_id.is_empty() {
            return Err(AuthError::InvalidMessage("empty sender id".into()));
        }
        if sender_id.len() > MAX_SENDER_ID_LEN {
            return Err(AuthError::InvalidMessage(format!(
                "sender id longer than {MAX_SENDER_ID_LEN} bytes"
            )));
        }
        if !speed.is_finite() {
            return Err(AuthError::InvalidMessage(format!("non-finite speed {speed}")));
        }
        if !position.x.is_finite() || !position.y.is_finite() {
            return Err(AuthError::InvalidMessage(format!(
                "non-finite position ({}, {})",
                position.x, position.y
            )));
        }

        Ok(Self {
            sender_id,
            speed,
            position,
        })
    }

    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Copy of this message with a different speed.
    pub fn with_speed(&self, speed: f64) -> Result<Self, AuthError> {
        Self::new(self.sender_id.clone(), speed, self.position)
    }

    /// Copy of this message with a different position.
    pub fn with_position(&self, position: Position) -> Result<Self, AuthError> {
        Self::new(self.sender_id.clone(), self.speed, position)
    }
}

// =============================================================================
// Digests
// =============================================================================

/// Wall-clock time spent computing one digest.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HashTiming {
    pub algorithm: HashAlgorithm,
    pub elapsed_secs: f64,
}

/// Algorithm → digest bytes, plus informational timings.
///
/// Equality only considers the digests; timings never take part in integrity
/// decisions.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DigestSet {
    digests: BTreeMap<HashAlgorithm, Vec<u8>>,
    timings: Vec<HashTiming>,
}

impl DigestSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert (or replace) a digest.
    pub fn insert(&mut self, algorithm: HashAlgorithm, digest: Vec<u8>) {
        self.digests.insert(algorithm, digest);
    }

    /// Remove a digest, returning it if present.
    pub fn remove(&mut self, algorithm: HashAlgorithm) -> Option<Vec<u8>> {
        self.digests.remove(&algorithm)
    }

    pub fn get(&self, algorithm: HashAlgorithm) -> Option<&[u8]> {
        self.digests.get(&algorithm).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (HashAlgorithm, &[u8])> {
        self.digests.iter().map(|(a, d)| (*a, d.as_slice()))
    }

    pub(crate) fn push_timing(&mut self, timing: HashTiming) {
        self.timings.push(timing);
    }

    pub fn timings(&self) -> &[HashTiming] {
        &self.timings
    }

    /// Timings keyed the way reporting tools expect them (`sha256_time`, ...).
    pub fn timing_entries(&self) -> BTreeMap<String, f64> {
        self.timings
            .iter()
            .map(|t| (format!("{}_time", t.algorithm.name()), t.elapsed_secs))
            .collect()
    }

    /// Lowercase hex of one digest, for logs.
    pub fn hex(&self, algorithm: HashAlgorithm) -> Option<String> {
        self.get(algorithm).map(hex::encode)
    }
}

impl PartialEq for DigestSet {
    fn eq(&self, other: &Self) -> bool {
        self.digests == other.digests
    }
}

// =============================================================================
// Keys and Signatures
// =============================================================================

/// RSA PKCS#1 v1.5 signature bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// RSA public key in PKCS#1 DER form, as carried in every envelope.
///
/// Bytes are not validated on construction: an envelope may carry garbage, and
/// that must surface as a failed signature check rather than an error.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    der: Vec<u8>,
}

impl PublicKey {
    /// Encode an RSA public key.
    pub fn from_rsa(key: &RsaPublicKey) -> Result<Self, AuthError> {
        let document = key
            .to_pkcs1_der()
            .map_err(|e| AuthError::InvalidPublicKey(e.to_string()))?;
        Ok(Self {
            der: document.as_bytes().to_vec(),
        })
    }

    /// Wrap raw DER bytes received from the wire.
    pub fn from_der(der: Vec<u8>) -> Self {
        Self { der }
    }

    /// Decode into an RSA public key.
    pub fn to_rsa(&self) -> Result<RsaPublicKey, AuthError> {
        RsaPublicKey::from_pkcs1_der(&self.der)
            .map_err(|e| AuthError::InvalidPublicKey(e.to_string()))
    }

    pub fn as_der(&self) -> &[u8] {
        &self.der
    }

    /// Short SHA-256 fingerprint (first 8 bytes, hex) for logs.
    pub fn fingerprint(&self) -> String {
        let hash = Sha256::digest(&self.der);
        hex::encode(&hash[..8])
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublicKey")
            .field("fingerprint", &self.fingerprint())
            .field("len", &self.der.len())
            .finish()
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// Everything a sender broadcasts: message, digests, signature, and public key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub message: Message,
    pub digests: DigestSet,
    pub signature: Signature,
    pub public_key: PublicKey,
}

impl Envelope {
    /// Serialize for transport.
    pub fn encode(&self) -> Result<Vec<u8>, AuthError> {
        bincode::serialize(self).map_err(|e| AuthError::MalformedEnvelope(e.to_string()))
    }

    /// Deserialize a received payload into an independent copy.
    pub fn decode(bytes: &[u8]) -> Result<Self, AuthError> {
        bincode::deserialize(bytes).map_err(|e| AuthError::MalformedEnvelope(e.to_string()))
    }
}

// =============================================================================
// Decisions
// =============================================================================

/// Outcome of verifying one received message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AcceptDecision {
    /// Digests and signature both check out
    Accepted,
    /// Signature is fine, but at least one digest is missing or wrong
    RejectedIntegrity,
    /// Digests match, but the signature does not verify
    RejectedSignature,
    /// Both checks failed
    RejectedBoth,
}

impl AcceptDecision {
    /// Combine the two independent check results.
    pub fn from_checks(integrity_ok: bool, signature_ok: bool) -> Self {
        match (integrity_ok, signature_ok) {
            (true, true) => AcceptDecision::Accepted,
            (false, true) => AcceptDecision::RejectedIntegrity,
            (true, false) => AcceptDecision::RejectedSignature,
            (false, false) => AcceptDecision::RejectedBoth,
        }
    }

    pub fn is_accepted(self) -> bool {
        self == AcceptDecision::Accepted
    }

    /// True when a digest mismatch contributed to the rejection.
    pub fn integrity_failed(self) -> bool {
        matches!(
            self,
            AcceptDecision::RejectedIntegrity | AcceptDecision::RejectedBoth
        )
    }

    /// True when the signature check contributed to the rejection.
    pub fn signature_failed(self) -> bool {
        matches!(
            self,
            AcceptDecision::RejectedSignature | AcceptDecision::RejectedBoth
        )
    }

    /// Stable label for metrics.
    pub fn label(self) -> &'static str {
        match self {
            AcceptDecision::Accepted => "accepted",
            AcceptDecision::RejectedIntegrity => "rejected_integrity",
            AcceptDecision::RejectedSignature => "rejected_signature",
            AcceptDecision::RejectedBoth => "rejected_both",
        }
    }
}

impl fmt::Display for AcceptDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
