//! # Node Service
//!
//! Composition root for one vehicle: implements `MessageAuthApi` on top of the
//! domain layer.
//!
//! ## Architecture
//!
//! This is the hexagonal "application service" that:
//! - Implements the inbound port (`MessageAuthApi`)
//! - Reports outcomes through the outbound port (`MetricsSink`)
//! - Delegates hashing, signing, and verification to the domain layer
//!
//! ## Lifecycle
//!
//! Keys are generated (or injected) in the constructor and never change. The
//! only mutable state is the kinematic snapshot, written by the mobility
//! collaborator through [`Node::update_kinematics`], and the shared metrics sink.

use crate::config::AuthConfig;
use crate::domain::digest::DigestEngine;
use crate::domain::entities::{
    AcceptDecision, DigestSet, Envelope, Kinematics, Message, NodeId, Position, PublicKey,
    Signature,
};
use crate::domain::errors::AuthError;
use crate::domain::keystore::{KeySource, KeyStore};
use crate::domain::salt::{Salt, SaltScheme};
use crate::domain::verifier::Verifier;
use crate::ports::inbound::MessageAuthApi;
use crate::ports::outbound::MetricsSink;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Network-wide protocol settings shared by every node of a run.
#[derive(Clone, Debug)]
pub struct ProtocolContext {
    pub engine: Arc<DigestEngine>,
    pub salt_scheme: Arc<SaltScheme>,
    pub key_bits: usize,
}

impl ProtocolContext {
    pub fn new(engine: DigestEngine, salt_scheme: SaltScheme, key_bits: usize) -> Self {
        Self {
            engine: Arc::new(engine),
            salt_scheme: Arc::new(salt_scheme),
            key_bits,
        }
    }

    /// Validate a configuration and build the shared context.
    ///
    /// # Errors
    /// Any configuration fault: unknown or missing algorithms, weak key size,
    /// unusable salt material.
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        config.validate()?;
        let engine = DigestEngine::from_names(&config.algorithms)?;
        let salt_scheme = config.salt_scheme()?;
        Ok(Self::new(engine, salt_scheme, config.key_bits))
    }
}

/// A vehicle: keypair, salt, verifier, and a handle to the run's metrics.
pub struct Node<M: MetricsSink> {
    id: NodeId,
    kinematics: RwLock<Kinematics>,
    keys: KeyStore,
    salt: Salt,
    verifier: Verifier,
    context: ProtocolContext,
    metrics: M,
}

impl<M: MetricsSink> Node<M> {
    /// Create a node, generating its keypair.
    ///
    /// Key generation blocks until done; the node cannot take part in any
    /// exchange before that.
    ///
    /// # Errors
    /// * `WeakKeySize` / `KeyGeneration` - fatal; the caller must not retry
    pub fn new(
        id: impl Into<NodeId>,
        kinematics: Kinematics,
        context: ProtocolContext,
        key_source: KeySource,
        metrics: M,
    ) -> Result<Self, AuthError> {
        let keys = KeyStore::generate(context.key_bits, key_source)?;
        Self::with_keys(id, kinematics, keys, context, metrics)
    }

    /// Create a node around an existing keypair.
    pub fn with_keys(
        id: impl Into<NodeId>,
        kinematics: Kinematics,
        keys: KeyStore,
        context: ProtocolContext,
        metrics: M,
    ) -> Result<Self, AuthError> {
        let id = id.into();
        // Reject bad ids and kinematics now rather than on the first broadcast.
        Message::new(id.clone(), kinematics.speed, kinematics.position)?;

        let salt = context.salt_scheme.salt_for(&id);
        let verifier = Verifier::new(Arc::clone(&context.engine));

        info!(
            node = %id,
            key = %keys.public_key().fingerprint(),
            salt_scheme = context.salt_scheme.kind(),
            "Node initialized"
        );

        Ok(Self {
            id,
            kinematics: RwLock::new(kinematics),
            keys,
            salt,
            verifier,
            context,
            metrics,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current kinematic snapshot.
    pub fn kinematics(&self) -> Kinematics {
        *self.kinematics.read()
    }

    /// Per-step callback from the mobility collaborator.
    pub fn update_kinematics(&self, speed: f64, position: Position) {
        *self.kinematics.write() = Kinematics::new(speed, position);
    }

    pub fn salt(&self) -> &Salt {
        &self.salt
    }

    pub fn context(&self) -> &ProtocolContext {
        &self.context
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }
}

impl<M: MetricsSink> MessageAuthApi for Node<M> {
    fn node_id(&self) -> &str {
        &self.id
    }

    fn public_key(&self) -> &PublicKey {
        self.keys.public_key()
    }

    fn generate_message(&self) -> Result<Envelope, AuthError> {
        let snapshot = self.kinematics();
        let message = Message::new(self.id.clone(), snapshot.speed, snapshot.position)?;

        let digests = self.context.engine.compute(&message, &self.salt);
        let signature = self.keys.sign(&message)?;
        self.metrics.record_timings(&digests);

        Ok(Envelope {
            message,
            digests,
            signature,
            public_key: self.keys.public_key().clone(),
        })
    }

    fn receive_message(
        &self,
        message: &Message,
        digests: &DigestSet,
        signature: &Signature,
        sender_public_key: &PublicKey,
    ) -> AcceptDecision {
        let sender_salt = self.context.salt_scheme.salt_for(message.sender_id());
        let decision =
            self.verifier
                .accept(message, digests, signature, sender_public_key, &sender_salt);

        if decision.is_accepted() {
            debug!(
                node = %self.id,
                from = message.sender_id(),
                "Message is authentic and unaltered"
            );
        } else {
            warn!(
                node = %self.id,
                from = message.sender_id(),
                %decision,
                "Message failed integrity or signature verification"
            );
        }

        self.metrics.record(decision);
        decision
    }
}

impl<M: MetricsSink> std::fmt::Debug for Node<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("kinematics", &self.kinematics())
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}
