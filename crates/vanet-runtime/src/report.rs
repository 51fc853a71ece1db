//! Final run report: detection counters and digest timing summary.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use vanet_auth::{HashAlgorithm, HashTiming, MetricsCollector};

/// Summary of the timing samples for one algorithm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingSummary {
    pub algorithm: HashAlgorithm,
    pub samples: usize,
    pub mean_secs: f64,
    pub min_secs: f64,
    pub max_secs: f64,
}

/// Group timing samples by algorithm.
pub fn summarize_timings(timings: &[HashTiming]) -> Vec<TimingSummary> {
    let mut grouped: BTreeMap<HashAlgorithm, Vec<f64>> = BTreeMap::new();
    for timing in timings {
        grouped
            .entry(timing.algorithm)
            .or_default()
            .push(timing.elapsed_secs);
    }

    grouped
        .into_iter()
        .map(|(algorithm, samples)| {
            let total: f64 = samples.iter().sum();
            TimingSummary {
                algorithm,
                samples: samples.len(),
                mean_secs: total / samples.len() as f64,
                min_secs: samples.iter().copied().fold(f64::INFINITY, f64::min),
                max_secs: samples.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            }
        })
        .collect()
}

/// What a run produced.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub steps: u32,
    pub vehicles: usize,
    pub broadcasts: u64,
    pub malformed: u64,
    pub collisions: u64,
    pub total_messages: u64,
    pub tampered_detected: u64,
    pub detection_rate: f64,
    pub timings: Vec<TimingSummary>,
}

impl SimulationReport {
    /// Snapshot the collector plus run-level counters.
    pub fn collect(
        metrics: &MetricsCollector,
        steps: u32,
        vehicles: usize,
        broadcasts: u64,
        malformed: u64,
        collisions: u64,
    ) -> Self {
        Self {
            steps,
            vehicles,
            broadcasts,
            malformed,
            collisions,
            total_messages: metrics.total_messages(),
            tampered_detected: metrics.tampered_detected(),
            detection_rate: metrics.detection_rate(),
            timings: summarize_timings(&metrics.timings()),
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Messages: {}", self.total_messages)?;
        writeln!(f, "Tampered Detected: {}", self.tampered_detected)?;
        writeln!(f, "Detection Rate: {:.2}%", self.detection_rate)?;
        writeln!(
            f,
            "Steps: {}  Vehicles: {}  Broadcasts: {}  Collisions: {}  Malformed: {}",
            self.steps, self.vehicles, self.broadcasts, self.collisions, self.malformed
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "{:<10} {:>8} {:>14} {:>14} {:>14}",
            "hash_type", "samples", "mean (s)", "min (s)", "max (s)"
        )?;
        for t in &self.timings {
            writeln!(
                f,
                "{:<10} {:>8} {:>14.3e} {:>14.3e} {:>14.3e}",
                t.algorithm.name(),
                t.samples,
                t.mean_secs,
                t.min_secs,
                t.max_secs
            )?;
        }
        Ok(())
    }
}
