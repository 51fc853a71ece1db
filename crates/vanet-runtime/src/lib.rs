//! # VANET Runtime
//!
//! Simulation driver around the `vanet-auth` protocol core.
//!
//! ## Modules
//!
//! - `config` - `VANET_*` environment configuration
//! - `telemetry` - tracing subscriber setup
//! - `mobility` - vehicle movement and collision checks
//! - `simulation` - fleet construction and the per-step broadcast loop
//! - `report` - detection counters and digest timing summary
//!
//! ## Run Sequence
//!
//! 1. Load and validate configuration
//! 2. Generate every vehicle's keypair (in parallel, before any exchange)
//! 3. Opening exchange: one valid message, one tampered copy
//! 4. Steps: move, check collisions, broadcast to every other vehicle
//! 5. Report

pub mod config;
pub mod mobility;
pub mod report;
pub mod simulation;
pub mod telemetry;

pub use config::{ConfigError, LogConfig, RuntimeConfig, SimulationConfig};
pub use mobility::{in_collision, MobilityModel, RandomDrift};
pub use report::{summarize_timings, SimulationReport, TimingSummary};
pub use simulation::{
    default_fleet, ScenarioOutcome, SimNode, Simulation, SimulationError, VehicleSpec,
};
pub use telemetry::init_logging;
