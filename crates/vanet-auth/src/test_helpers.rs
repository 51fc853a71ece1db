//! Seeded fixtures for tests.
//!
//! RSA-2048 generation is the slowest thing in the crate, so a small pool of
//! seeded keypairs is generated once per test binary and cloned out.

use crate::domain::digest::DigestEngine;
use crate::domain::entities::{Kinematics, Message, Position};
use crate::domain::keystore::{KeySource, KeyStore, MIN_KEY_BITS};
use crate::domain::salt::SaltScheme;
use crate::ports::outbound::MetricsSink;
use crate::service::{Node, ProtocolContext};
use lazy_static::lazy_static;

/// Base seed of the fixture key pool.
pub const FIXTURE_SEED: u64 = 0x5A17_C0DE;

/// Number of distinct fixture keypairs.
pub const FIXTURE_KEY_COUNT: usize = 4;

lazy_static! {
    static ref FIXTURE_KEYS: Vec<KeyStore> = (0..FIXTURE_KEY_COUNT as u64)
        .map(|i| {
            KeyStore::generate(MIN_KEY_BITS, KeySource::Seeded(FIXTURE_SEED).for_node(i))
                .expect("fixture key generation failed")
        })
        .collect();
}

/// The `index`-th fixture keypair (wraps around the pool).
pub fn fixture_keys(index: usize) -> KeyStore {
    FIXTURE_KEYS[index % FIXTURE_KEY_COUNT].clone()
}

/// All algorithms, sender-derived salts from a fixed network key.
pub fn test_context() -> ProtocolContext {
    let scheme = SaltScheme::sender_derived(b"vanet-test-network".to_vec())
        .expect("non-empty network key");
    ProtocolContext::new(DigestEngine::all(), scheme, MIN_KEY_BITS)
}

/// A valid message at the origin.
pub fn sample_message(sender_id: &str, speed: f64) -> Message {
    Message::new(sender_id, speed, Position::new(0.0, 0.0)).expect("valid sample message")
}

/// A node on [`test_context`] using fixture key `key_index`.
pub fn test_node<M: MetricsSink>(
    id: &str,
    speed: f64,
    position: Position,
    key_index: usize,
    metrics: M,
) -> Node<M> {
    Node::with_keys(
        id,
        Kinematics::new(speed, position),
        fixture_keys(key_index),
        test_context(),
        metrics,
    )
    .expect("valid test node")
}
