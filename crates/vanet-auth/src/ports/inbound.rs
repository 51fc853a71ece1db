//! # Inbound Ports (Driving Ports / API)
//!
//! The API a simulation (or a real radio stack) drives on each node.

use crate::domain::entities::{
    AcceptDecision, DigestSet, Envelope, Message, PublicKey, Signature,
};
use crate::domain::errors::AuthError;
use rayon::prelude::*;

/// Message authentication API of a single node.
///
/// Implementations must be thread-safe (`Send + Sync`): a node may receive from
/// many senders concurrently.
pub trait MessageAuthApi: Send + Sync {
    /// Identifier this node signs as.
    fn node_id(&self) -> &str;

    /// Public key to hand to receivers.
    fn public_key(&self) -> &PublicKey;

    /// Snapshot the current kinematic state and produce a signed, digested envelope.
    ///
    /// # Errors
    /// * `InvalidMessage` - the mobility collaborator supplied non-finite values
    /// * `SigningFailed` - the private key refused to sign
    fn generate_message(&self) -> Result<Envelope, AuthError>;

    /// Verify a received message and record the outcome.
    ///
    /// Inputs are only borrowed immutably; a receiver can never alter what
    /// another receiver sees.
    fn receive_message(
        &self,
        message: &Message,
        digests: &DigestSet,
        signature: &Signature,
        sender_public_key: &PublicKey,
    ) -> AcceptDecision;

    /// Verify a received envelope.
    fn receive_envelope(&self, envelope: &Envelope) -> AcceptDecision {
        self.receive_message(
            &envelope.message,
            &envelope.digests,
            &envelope.signature,
            &envelope.public_key,
        )
    }

    /// Decode a transport payload into this node's own copy and verify it.
    ///
    /// # Errors
    /// * `MalformedEnvelope` - payload did not decode; nothing is recorded
    fn receive_encoded(&self, payload: &[u8]) -> Result<AcceptDecision, AuthError> {
        let envelope = Envelope::decode(payload)?;
        Ok(self.receive_envelope(&envelope))
    }

    /// Verify many envelopes in parallel, one decision per envelope in order.
    fn receive_batch(&self, envelopes: &[Envelope]) -> Vec<AcceptDecision> {
        envelopes
            .par_iter()
            .map(|envelope| self.receive_envelope(envelope))
            .collect()
    }
}
