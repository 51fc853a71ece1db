//! # Outbound Ports (Driven Ports / SPI)
//!
//! Where a node reports what it saw.

use crate::domain::entities::{AcceptDecision, DigestSet};
use std::sync::Arc;

/// Sink for verification outcomes and digest timings.
///
/// Implementations are shared between every node of a run and are called from
/// many threads at once; increments must never be lost.
pub trait MetricsSink: Send + Sync {
    /// Record the outcome of one received message.
    fn record(&self, decision: AcceptDecision);

    /// Record the per-algorithm timings of a freshly computed digest set.
    fn record_timings(&self, digests: &DigestSet);
}

impl<T: MetricsSink + ?Sized> MetricsSink for Arc<T> {
    fn record(&self, decision: AcceptDecision) {
        (**self).record(decision)
    }

    fn record_timings(&self, digests: &DigestSet) {
        (**self).record_timings(digests)
    }
}
