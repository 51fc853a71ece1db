//! Verification metrics for a simulation run.
//!
//! Each [`MetricsCollector`] owns a private Prometheus registry, so independent
//! runs (and tests) never share counters. All metrics follow the naming
//! convention `vanet_<metric>_<unit>`.
//!
//! ## Metric Types
//!
//! - **Counter**: messages received, messages rejected, decisions by outcome
//! - **Histogram**: digest computation time by algorithm

use crate::domain::entities::{AcceptDecision, DigestSet, HashTiming};
use crate::domain::errors::AuthError;
use crate::ports::outbound::MetricsSink;
use parking_lot::Mutex;
use prometheus::{
    exponential_buckets, Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts,
    Registry, TextEncoder,
};

/// Counters for received messages plus a log of digest timings.
pub struct MetricsCollector {
    registry: Registry,
    total_messages: IntCounter,
    tampered_detected: IntCounter,
    decisions: IntCounterVec,
    digest_duration: HistogramVec,
    timing_log: Mutex<Vec<HashTiming>>,
}

impl MetricsCollector {
    /// Create a collector with all metrics registered in a fresh registry.
    pub fn new() -> Result<Self, AuthError> {
        let registry = Registry::new();

        let total_messages = IntCounter::new(
            "vanet_messages_received_total",
            "Total messages received and verified",
        )?;

        let tampered_detected = IntCounter::new(
            "vanet_messages_rejected_total",
            "Messages rejected for failed integrity or signature checks",
        )?;

        let decisions = IntCounterVec::new(
            Opts::new("vanet_decisions_total", "Verification decisions by outcome"),
            &["outcome"], // accepted/rejected_integrity/rejected_signature/rejected_both
        )?;

        let digest_duration = HistogramVec::new(
            HistogramOpts::new(
                "vanet_digest_duration_seconds",
                "Time spent computing one message digest",
            )
            .buckets(exponential_buckets(1e-7, 4.0, 12)?),
            &["algorithm"],
        )?;

        registry.register(Box::new(total_messages.clone()))?;
        registry.register(Box::new(tampered_detected.clone()))?;
        registry.register(Box::new(decisions.clone()))?;
        registry.register(Box::new(digest_duration.clone()))?;

        Ok(Self {
            registry,
            total_messages,
            tampered_detected,
            decisions,
            digest_duration,
            timing_log: Mutex::new(Vec::new()),
        })
    }

    /// Messages received so far.
    pub fn total_messages(&self) -> u64 {
        self.total_messages.get()
    }

    /// Messages rejected so far.
    pub fn tampered_detected(&self) -> u64 {
        self.tampered_detected.get()
    }

    /// Count of one specific decision.
    pub fn decision_count(&self, decision: AcceptDecision) -> u64 {
        self.decisions.with_label_values(&[decision.label()]).get()
    }

    /// Percentage of received messages that were rejected; 0 before any message.
    pub fn detection_rate(&self) -> f64 {
        // `record` bumps the total before the rejection count, so reading in the
        // opposite order never sees more rejections than messages.
        let tampered = self.tampered_detected();
        let total = self.total_messages();
        if total == 0 {
            return 0.0;
        }
        (100.0 * tampered as f64 / total as f64).min(100.0)
    }

    /// Every recorded `(algorithm, elapsed_seconds)` sample, in recording order.
    pub fn timings(&self) -> Vec<HashTiming> {
        self.timing_log.lock().clone()
    }

    /// Prometheus text exposition of this collector's registry.
    pub fn encode(&self) -> Result<String, AuthError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| AuthError::Metrics(e.to_string()))
    }
}

impl MetricsSink for MetricsCollector {
    fn record(&self, decision: AcceptDecision) {
        self.total_messages.inc();
        if !decision.is_accepted() {
            self.tampered_detected.inc();
        }
        self.decisions.with_label_values(&[decision.label()]).inc();
    }

    fn record_timings(&self, digests: &DigestSet) {
        for timing in digests.timings() {
            self.digest_duration
                .with_label_values(&[timing.algorithm.name()])
                .observe(timing.elapsed_secs);
        }
        self.timing_log.lock().extend_from_slice(digests.timings());
    }
}

impl std::fmt::Debug for MetricsCollector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsCollector")
            .field("total_messages", &self.total_messages())
            .field("tampered_detected", &self.tampered_detected())
            .finish()
    }
}
