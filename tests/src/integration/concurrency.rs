//! # Concurrency Tests
//!
//! Many receivers sharing one `MetricsCollector`: counters must equal the
//! number of verifications performed, whatever the interleaving.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rayon::prelude::*;
    use tokio::task::JoinSet;
    use vanet_auth::test_helpers::test_node;
    use vanet_auth::{AcceptDecision, MessageAuthApi, MetricsCollector, Node, Position};

    type TestNode = Node<Arc<MetricsCollector>>;

    fn pair(metrics: &Arc<MetricsCollector>) -> (Arc<TestNode>, Arc<TestNode>) {
        let sender = test_node("V1", 65.0, Position::new(0.0, 0.0), 0, Arc::clone(metrics));
        let receiver = test_node("V2", 50.0, Position::new(10.0, 20.0), 1, Arc::clone(metrics));
        (Arc::new(sender), Arc::new(receiver))
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_concurrent_receipts_are_all_counted() {
        const RECEIPTS: u64 = 200;

        let metrics = Arc::new(MetricsCollector::new().unwrap());
        let (sender, receiver) = pair(&metrics);

        // One distinct message per receipt; every tenth is altered in transit.
        let payloads: Vec<Vec<u8>> = (0..RECEIPTS)
            .map(|i| {
                let f = i as f64;
                sender.update_kinematics(f, Position::new(f, f / 2.0));
                let mut envelope = sender.generate_message().unwrap();
                if i % 10 == 0 {
                    envelope.message = envelope.message.with_speed(f + 1.0).unwrap();
                }
                envelope.encode().unwrap()
            })
            .collect();
        assert_ne!(payloads[1], payloads[2]);

        let mut tasks = JoinSet::new();
        for payload in payloads {
            let receiver = Arc::clone(&receiver);
            tasks.spawn_blocking(move || receiver.receive_encoded(&payload));
        }

        let mut accepted = 0;
        while let Some(joined) = tasks.join_next().await {
            if joined.unwrap().unwrap().is_accepted() {
                accepted += 1;
            }
        }

        assert_eq!(accepted, RECEIPTS - RECEIPTS / 10);
        assert_eq!(metrics.total_messages(), RECEIPTS);
        assert_eq!(metrics.tampered_detected(), RECEIPTS / 10);
    }

    #[test]
    fn test_parallel_mixed_batch_counts_each_class() {
        let metrics = Arc::new(MetricsCollector::new().unwrap());
        let (sender, receiver) = pair(&metrics);

        let honest = sender.generate_message().unwrap();
        let mut tampered = honest.clone();
        tampered.message = tampered.message.with_speed(100.0).unwrap();

        // Every third envelope is tampered.
        let batch: Vec<_> = (0..300)
            .map(|i| if i % 3 == 0 { tampered.clone() } else { honest.clone() })
            .collect();

        let decisions = receiver.receive_batch(&batch);

        assert_eq!(decisions.len(), 300);
        assert_eq!(decisions[0], AcceptDecision::RejectedBoth);
        assert_eq!(decisions[1], AcceptDecision::Accepted);
        assert_eq!(metrics.total_messages(), 300);
        assert_eq!(metrics.tampered_detected(), 100);
        assert_eq!(metrics.decision_count(AcceptDecision::Accepted), 200);
        assert!((metrics.detection_rate() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_generation_races_with_kinematics_updates() {
        let metrics = Arc::new(MetricsCollector::new().unwrap());
        let (sender, receiver) = pair(&metrics);

        // Each generated message carries one consistent snapshot, so it always
        // verifies even while another thread keeps moving the sender.
        let decisions: Vec<AcceptDecision> = (0..64u32)
            .into_par_iter()
            .map(|i| {
                if i % 2 == 0 {
                    let f = f64::from(i);
                    sender.update_kinematics(f, Position::new(f, -f));
                }
                let envelope = sender.generate_message().unwrap();
                let (speed, position) = (envelope.message.speed(), envelope.message.position());
                let initial = speed == 65.0 && position == Position::new(0.0, 0.0);
                let updated = position == Position::new(speed, -speed);
                assert!(initial || updated, "torn snapshot: {speed} at {position:?}");
                receiver.receive_envelope(&envelope)
            })
            .collect();

        assert!(decisions.iter().all(|d| d.is_accepted()));
        assert_eq!(metrics.total_messages(), 64);
        assert_eq!(metrics.timings().len(), 64 * 5);
    }
}
