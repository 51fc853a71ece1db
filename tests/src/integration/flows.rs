//! # Integration Test Flows
//!
//! Node-to-node exchanges over the public `MessageAuthApi`:
//!
//! 1. **Broadcast**: one sender, every receiver accepts
//! 2. **Transport**: encoded envelopes survive the wire; altered ones do not
//! 3. **Attacks**: forged digests, forged signatures, impersonation
//! 4. **Configuration**: salt scheme and algorithm set must agree network-wide

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vanet_auth::test_helpers::{fixture_keys, test_context, test_node};
    use vanet_auth::{
        AcceptDecision, DigestEngine, HashAlgorithm, Kinematics, MessageAuthApi,
        MetricsCollector, Node, Position, ProtocolContext, SaltScheme, MIN_KEY_BITS,
    };

    type TestNode = Node<Arc<MetricsCollector>>;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn metrics() -> Arc<MetricsCollector> {
        Arc::new(MetricsCollector::new().unwrap())
    }

    /// The reference fleet on the shared test context.
    fn fleet(metrics: &Arc<MetricsCollector>) -> Vec<TestNode> {
        [
            ("V1", 65.0, Position::new(0.0, 0.0)),
            ("V2", 50.0, Position::new(10.0, 20.0)),
            ("V3", 35.0, Position::new(30.0, 50.0)),
            ("V4", 20.0, Position::new(10.0, 50.0)),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (id, speed, position))| test_node(id, speed, position, i, Arc::clone(metrics)))
        .collect()
    }

    fn node_on(
        context: ProtocolContext,
        id: &str,
        key_index: usize,
        metrics: &Arc<MetricsCollector>,
    ) -> TestNode {
        Node::with_keys(
            id,
            Kinematics::new(40.0, Position::new(1.0, 2.0)),
            fixture_keys(key_index),
            context,
            Arc::clone(metrics),
        )
        .unwrap()
    }

    // =============================================================================
    // BROADCAST
    // =============================================================================

    #[test]
    fn test_every_receiver_accepts_an_honest_broadcast() {
        let metrics = metrics();
        let nodes = fleet(&metrics);

        for (i, sender) in nodes.iter().enumerate() {
            let envelope = sender.generate_message().unwrap();
            for (j, receiver) in nodes.iter().enumerate() {
                if i != j {
                    assert_eq!(
                        receiver.receive_envelope(&envelope),
                        AcceptDecision::Accepted,
                        "{} rejected {}",
                        receiver.id(),
                        sender.id()
                    );
                }
            }
        }

        assert_eq!(metrics.total_messages(), 12);
        assert_eq!(metrics.tampered_detected(), 0);
        assert_eq!(metrics.detection_rate(), 0.0);
    }

    #[test]
    fn test_broadcast_carries_current_kinematics() {
        let metrics = metrics();
        let nodes = fleet(&metrics);

        nodes[2].update_kinematics(42.5, Position::new(31.0, 52.5));
        let envelope = nodes[2].generate_message().unwrap();

        assert_eq!(envelope.message.sender_id(), "V3");
        assert_eq!(envelope.message.speed(), 42.5);
        assert_eq!(envelope.message.position(), Position::new(31.0, 52.5));
        assert_eq!(&envelope.public_key, nodes[2].public_key());
        assert_eq!(nodes[0].receive_envelope(&envelope), AcceptDecision::Accepted);
    }

    // =============================================================================
    // TRANSPORT
    // =============================================================================

    #[test]
    fn test_encoded_envelope_accepted_by_every_receiver() {
        let metrics = metrics();
        let nodes = fleet(&metrics);
        let payload = nodes[0].generate_message().unwrap().encode().unwrap();

        for receiver in &nodes[1..] {
            assert_eq!(
                receiver.receive_encoded(&payload).unwrap(),
                AcceptDecision::Accepted
            );
        }
    }

    #[test]
    fn test_position_altered_in_transit_rejected() {
        let metrics = metrics();
        let nodes = fleet(&metrics);
        let mut envelope = nodes[0].generate_message().unwrap();

        envelope.message = envelope
            .message
            .with_position(Position::new(500.0, 500.0))
            .unwrap();
        let payload = envelope.encode().unwrap();

        let decision = nodes[1].receive_encoded(&payload).unwrap();
        assert!(decision.integrity_failed());
        assert!(decision.signature_failed());
        assert_eq!(metrics.tampered_detected(), 1);
    }

    #[test]
    fn test_truncated_payload_is_not_counted() {
        let metrics = metrics();
        let nodes = fleet(&metrics);
        let payload = nodes[0].generate_message().unwrap().encode().unwrap();

        assert!(nodes[1].receive_encoded(&payload[..payload.len() / 2]).is_err());
        assert_eq!(metrics.total_messages(), 0);
    }

    #[test]
    fn test_nan_speed_payload_is_not_decoded_or_counted() {
        let metrics = metrics();
        let nodes = fleet(&metrics);
        let mut payload = nodes[0].generate_message().unwrap().encode().unwrap();

        // bincode layout: u64 id length, "V1", then the speed as a little-endian f64.
        let speed_at = 8 + "V1".len();
        assert_eq!(
            f64::from_le_bytes(payload[speed_at..speed_at + 8].try_into().unwrap()),
            65.0
        );
        payload[speed_at..speed_at + 8].copy_from_slice(&f64::NAN.to_le_bytes());

        assert!(nodes[1].receive_encoded(&payload).is_err());
        assert_eq!(metrics.total_messages(), 0);
    }

    #[test]
    fn test_empty_sender_id_payload_is_not_decoded_or_counted() {
        let metrics = metrics();
        let nodes = fleet(&metrics);
        let payload = nodes[0].generate_message().unwrap().encode().unwrap();

        // Drop the two id bytes and zero the length prefix.
        let mut emptied = vec![0u8; 8];
        emptied.extend_from_slice(&payload[8 + "V1".len()..]);

        assert!(nodes[1].receive_encoded(&emptied).is_err());
        assert_eq!(metrics.total_messages(), 0);
    }

    // =============================================================================
    // ATTACKS
    // =============================================================================

    #[test]
    fn test_insider_recomputing_digests_still_fails_signature() {
        let metrics = metrics();
        let nodes = fleet(&metrics);
        let context = test_context();
        let mut envelope = nodes[0].generate_message().unwrap();

        // An insider who knows the salt derivation can make the digests match.
        let forged = envelope.message.with_speed(120.0).unwrap();
        let salt = context.salt_scheme.salt_for(forged.sender_id());
        envelope.digests = context.engine.compute(&forged, &salt);
        envelope.message = forged;

        assert_eq!(
            nodes[1].receive_envelope(&envelope),
            AcceptDecision::RejectedSignature
        );
    }

    #[test]
    fn test_resigning_with_another_key_fails_signature() {
        let metrics = metrics();
        let nodes = fleet(&metrics);
        let mut envelope = nodes[0].generate_message().unwrap();

        // V3 re-signs V1's message but leaves V1's public key attached.
        envelope.signature = fixture_keys(2).sign(&envelope.message).unwrap();

        assert_eq!(
            nodes[1].receive_envelope(&envelope),
            AcceptDecision::RejectedSignature
        );
    }

    #[test]
    fn test_key_substitution_accepted_without_identity_binding() {
        let metrics = metrics();
        let nodes = fleet(&metrics);
        let mut envelope = nodes[0].generate_message().unwrap();

        // V3 re-signs and attaches its own key; the claimed sender id is unchanged,
        // so the digests still verify. Nothing binds sender ids to keys.
        let attacker = fixture_keys(2);
        envelope.signature = attacker.sign(&envelope.message).unwrap();
        envelope.public_key = attacker.public_key().clone();

        assert_eq!(
            nodes[1].receive_envelope(&envelope),
            AcceptDecision::Accepted
        );
    }

    #[test]
    fn test_forged_digest_with_garbage_signature_rejected_both() {
        let metrics = metrics();
        let nodes = fleet(&metrics);
        let mut envelope = nodes[0].generate_message().unwrap();

        envelope.digests.insert(HashAlgorithm::Md5, vec![0u8; 16]);
        envelope.signature = vanet_auth::Signature::from_bytes(vec![0xAB; 256]);

        assert_eq!(
            nodes[1].receive_envelope(&envelope),
            AcceptDecision::RejectedBoth
        );
    }

    // =============================================================================
    // CONFIGURATION
    // =============================================================================

    #[test]
    fn test_shared_salt_network_exchanges() {
        let metrics = metrics();
        let scheme = SaltScheme::shared("vanet0123456789abcdef").unwrap();
        let context = ProtocolContext::new(DigestEngine::all(), scheme, MIN_KEY_BITS);

        let sender = node_on(context.clone(), "V1", 0, &metrics);
        let receiver = node_on(context, "V2", 1, &metrics);
        assert_eq!(sender.salt(), receiver.salt());

        let envelope = sender.generate_message().unwrap();
        assert_eq!(receiver.receive_envelope(&envelope), AcceptDecision::Accepted);
    }

    #[test]
    fn test_mismatched_network_keys_fail_integrity_only() {
        let metrics = metrics();
        let ctx_a = ProtocolContext::new(
            DigestEngine::all(),
            SaltScheme::sender_derived(b"network-a".to_vec()).unwrap(),
            MIN_KEY_BITS,
        );
        let ctx_b = ProtocolContext::new(
            DigestEngine::all(),
            SaltScheme::sender_derived(b"network-b".to_vec()).unwrap(),
            MIN_KEY_BITS,
        );

        let sender = node_on(ctx_a, "V1", 0, &metrics);
        let receiver = node_on(ctx_b, "V2", 1, &metrics);

        let envelope = sender.generate_message().unwrap();
        assert_eq!(
            receiver.receive_envelope(&envelope),
            AcceptDecision::RejectedIntegrity
        );
    }

    #[test]
    fn test_receiver_ignores_extra_digests_but_requires_its_own() {
        let metrics = metrics();
        let scheme = SaltScheme::sender_derived(b"vanet-test-network".to_vec()).unwrap();
        let sha_only = ProtocolContext::new(
            DigestEngine::new(&[HashAlgorithm::Sha256]).unwrap(),
            scheme,
            MIN_KEY_BITS,
        );

        let full = node_on(test_context(), "V1", 0, &metrics);
        let narrow = node_on(sha_only, "V2", 1, &metrics);

        // Full sender, narrow receiver: extra digests are ignored.
        let wide = full.generate_message().unwrap();
        assert_eq!(wide.digests.len(), HashAlgorithm::ALL.len());
        assert_eq!(narrow.receive_envelope(&wide), AcceptDecision::Accepted);

        // Narrow sender, full receiver: missing digests fail integrity.
        let slim = narrow.generate_message().unwrap();
        assert_eq!(slim.digests.len(), 1);
        assert_eq!(
            full.receive_envelope(&slim),
            AcceptDecision::RejectedIntegrity
        );
    }
}
