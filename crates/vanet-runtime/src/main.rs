//! # VANET Runtime
//!
//! Runs the reference four-vehicle simulation and prints the detection report.
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from `VANET_*` variables
//! 2. Install logging
//! 3. Validate configuration (fatal on any fault)
//! 4. Generate keys and build the fleet
//! 5. Run the opening exchange and every step
//! 6. Print the report as a table or JSON

use anyhow::{Context, Result};
use tracing::{debug, info};
use vanet_runtime::{default_fleet, init_logging, RuntimeConfig, Simulation};

#[tokio::main]
async fn main() -> Result<()> {
    let config = RuntimeConfig::from_env().context("failed to load configuration")?;
    init_logging(&config.logging)?;
    config.validate().context("invalid configuration")?;

    info!(
        steps = config.simulation.steps,
        dt = config.simulation.dt,
        seeded = config.simulation.seed.is_some(),
        tamper_every = config.simulation.tamper_every,
        "Starting VANET simulation"
    );

    let auth = config.auth.clone();
    let fleet = default_fleet();
    let mut simulation = tokio::task::spawn_blocking({
        let config = config.clone();
        move || Simulation::new(&config, &fleet)
    })
    .await
    .context("key generation task panicked")?
    .with_context(|| format!("failed to build fleet with {}-bit keys", auth.key_bits))?;

    let report = simulation.run().await.context("simulation failed")?;

    match simulation.metrics().encode() {
        Ok(text) => debug!(metrics = %text, "Final metrics"),
        Err(err) => debug!(error = %err, "Could not encode metrics"),
    }

    if config.simulation.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    info!(
        total_messages = report.total_messages,
        tampered_detected = report.tampered_detected,
        "Simulation finished"
    );
    Ok(())
}
