//! # Simulation
//!
//! Drives a fleet of nodes through mobility steps and broadcasts.
//!
//! ## Step Flow
//!
//! ```text
//! for each sender (in fleet order):
//!     mobility.advance ──→ Node::update_kinematics
//!     collision check against every other vehicle
//!     Node::generate_message ──→ Envelope::encode ──→ [optional in-transit tamper]
//!                                       │
//!            ┌──────────────────────────┼──────────────────────────┐
//!            ↓                          ↓                          ↓
//!     spawn_blocking            spawn_blocking             spawn_blocking
//!     receiver A decodes        receiver B decodes         receiver C decodes
//!     its own copy + verifies   its own copy + verifies    its own copy + verifies
//!            └──────────────────────────┴──────────────────────────┘
//!                                       ↓
//!                          shared MetricsCollector (atomic)
//! ```
//!
//! Receivers of one broadcast run concurrently; senders within a step run in
//! order, matching one radio slot per vehicle.

use crate::config::{ConfigError, RuntimeConfig, SimulationConfig};
use crate::mobility::{in_collision, MobilityModel, RandomDrift};
use crate::report::SimulationReport;
use rayon::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use vanet_auth::{
    AcceptDecision, AuthError, Envelope, Kinematics, MessageAuthApi, MetricsCollector, Node,
    Position, ProtocolContext,
};

/// Node type used by the simulation: every node shares one collector.
pub type SimNode = Node<Arc<MetricsCollector>>;

/// Speed offset applied by in-transit tampering.
pub const TAMPER_DELTA: f64 = 35.0;

/// Speed written into the tampered copy of the opening scenario.
pub const SCENARIO_TAMPERED_SPEED: f64 = 100.0;

/// Mixed into the run seed so mobility and key generation use different streams.
const MOBILITY_SEED_SALT: u64 = 0x6d6f_6269_6c69_7479;

/// Simulation errors.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("receiver task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("fleet needs at least two vehicles, got {0}")]
    FleetTooSmall(usize),

    #[error("duplicate vehicle id: {0}")]
    DuplicateVehicle(String),
}

/// Starting state of one vehicle.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleSpec {
    pub id: String,
    pub speed: f64,
    pub position: Position,
}

impl VehicleSpec {
    pub fn new(id: impl Into<String>, speed: f64, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            speed,
            position: Position::new(x, y),
        }
    }

    pub fn kinematics(&self) -> Kinematics {
        Kinematics::new(self.speed, self.position)
    }
}

/// The four-vehicle reference fleet.
pub fn default_fleet() -> Vec<VehicleSpec> {
    vec![
        VehicleSpec::new("V1", 65.0, 0.0, 0.0),
        VehicleSpec::new("V2", 50.0, 10.0, 20.0),
        VehicleSpec::new("V3", 35.0, 30.0, 50.0),
        VehicleSpec::new("V4", 20.0, 10.0, 50.0),
    ]
}

/// Decisions from the opening valid/tampered exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScenarioOutcome {
    pub valid: AcceptDecision,
    pub tampered: AcceptDecision,
}

/// A configured fleet ready to run.
pub struct Simulation {
    config: SimulationConfig,
    nodes: Vec<Arc<SimNode>>,
    metrics: Arc<MetricsCollector>,
    mobility: Box<dyn MobilityModel>,
    broadcasts: u64,
    malformed: u64,
    collisions: u64,
}

impl Simulation {
    /// Validate configuration, generate every node's keys, and build the fleet.
    ///
    /// Key generation for the fleet runs in parallel and must finish before the
    /// first exchange.
    pub fn new(config: &RuntimeConfig, fleet: &[VehicleSpec]) -> Result<Self, SimulationError> {
        config.validate()?;
        check_fleet(fleet)?;

        let mut auth = config.auth.clone();
        if auth.salt_key.is_none() {
            if let Some(seed) = config.simulation.seed {
                auth.salt_key = Some(format!("vanet{seed:016x}"));
            }
        }

        let context = ProtocolContext::from_config(&auth)?;
        let metrics = Arc::new(MetricsCollector::new()?);
        let key_source = config.simulation.key_source();

        info!(
            vehicles = fleet.len(),
            key_bits = context.key_bits,
            algorithms = ?context.engine.algorithms(),
            "Generating vehicle keys"
        );

        let nodes = fleet
            .par_iter()
            .enumerate()
            .map(|(index, spec)| {
                Node::new(
                    spec.id.clone(),
                    spec.kinematics(),
                    context.clone(),
                    key_source.for_node(index as u64),
                    Arc::clone(&metrics),
                )
                .map(Arc::new)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mobility = Box::new(RandomDrift::from_seed(
            config.simulation.seed.map(|s| s ^ MOBILITY_SEED_SALT),
        ));

        Self::from_nodes(config.simulation.clone(), nodes, metrics, mobility)
    }

    /// Build a simulation around existing nodes.
    ///
    /// Every node should report into `metrics`, otherwise the report undercounts.
    pub fn from_nodes(
        config: SimulationConfig,
        nodes: Vec<Arc<SimNode>>,
        metrics: Arc<MetricsCollector>,
        mobility: Box<dyn MobilityModel>,
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        if nodes.len() < 2 {
            return Err(SimulationError::FleetTooSmall(nodes.len()));
        }

        Ok(Self {
            config,
            nodes,
            metrics,
            mobility,
            broadcasts: 0,
            malformed: 0,
            collisions: 0,
        })
    }

    pub fn nodes(&self) -> &[Arc<SimNode>] {
        &self.nodes
    }

    pub fn metrics(&self) -> &Arc<MetricsCollector> {
        &self.metrics
    }

    /// Opening exchange: the first vehicle sends to the second, once intact and
    /// once with the speed rewritten to [`SCENARIO_TAMPERED_SPEED`].
    pub fn run_scenario(&self) -> Result<ScenarioOutcome, SimulationError> {
        let sender = &self.nodes[0];
        let receiver = &self.nodes[1];

        let envelope = sender.generate_message()?;
        let valid = receiver.receive_envelope(&envelope);

        let tampered_message = envelope.message.with_speed(SCENARIO_TAMPERED_SPEED)?;
        let tampered = receiver.receive_message(
            &tampered_message,
            &envelope.digests,
            &envelope.signature,
            &envelope.public_key,
        );

        info!(%valid, %tampered, "Opening scenario finished");
        Ok(ScenarioOutcome { valid, tampered })
    }

    /// Run the opening scenario and every configured step.
    pub async fn run(&mut self) -> Result<SimulationReport, SimulationError> {
        self.run_scenario()?;

        info!(steps = self.config.steps, "Running simulation");
        for step in 0..self.config.steps {
            self.step(step).await?;
        }

        Ok(self.report())
    }

    /// One step: every vehicle moves and broadcasts once.
    pub async fn step(&mut self, step: u32) -> Result<(), SimulationError> {
        for index in 0..self.nodes.len() {
            let sender = Arc::clone(&self.nodes[index]);

            let next = self.mobility.advance(sender.kinematics(), self.config.dt);
            sender.update_kinematics(next.speed, next.position);
            self.check_collisions(index);

            let envelope = sender.generate_message()?;
            self.broadcasts += 1;
            let payload = Arc::new(self.transmit(envelope)?);

            let mut receivers = JoinSet::new();
            for (other, receiver) in self.nodes.iter().enumerate() {
                if other == index {
                    continue;
                }
                let receiver = Arc::clone(receiver);
                let payload = Arc::clone(&payload);
                receivers.spawn_blocking(move || receiver.receive_encoded(&payload));
            }

            self.collect_receipts(&mut receivers, step, sender.id()).await?;
        }

        debug!(step, broadcasts = self.broadcasts, "Step complete");
        Ok(())
    }

    /// Wait for every receiver of one broadcast.
    ///
    /// A failed task does not stop the wait: the set is drained first so no
    /// receiver is still recording once the error is returned.
    async fn collect_receipts(
        &mut self,
        receivers: &mut JoinSet<Result<AcceptDecision, AuthError>>,
        step: u32,
        sender: &str,
    ) -> Result<(), SimulationError> {
        let mut failure = None;
        while let Some(joined) = receivers.join_next().await {
            match joined {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => {
                    self.malformed += 1;
                    warn!(step, sender, error = %err, "Dropped undecodable payload");
                }
                Err(err) => {
                    warn!(step, sender, error = %err, "Receiver task failed");
                    failure.get_or_insert(err);
                }
            }
        }

        match failure {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Snapshot the run so far.
    pub fn report(&self) -> SimulationReport {
        SimulationReport::collect(
            &self.metrics,
            self.config.steps,
            self.nodes.len(),
            self.broadcasts,
            self.malformed,
            self.collisions,
        )
    }

    /// Encode an envelope for the air, tampering with it when configured.
    fn transmit(&self, mut envelope: Envelope) -> Result<Vec<u8>, SimulationError> {
        let every = self.config.tamper_every;
        if every > 0 && self.broadcasts % every == 0 {
            let original = envelope.message.speed();
            envelope.message = envelope.message.with_speed(original + TAMPER_DELTA)?;
            debug!(
                sender = envelope.message.sender_id(),
                original,
                tampered = envelope.message.speed(),
                "Tampering with broadcast in transit"
            );
        }
        Ok(envelope.encode()?)
    }

    fn check_collisions(&mut self, index: usize) {
        let me = Arc::clone(&self.nodes[index]);
        let position = me.kinematics().position;
        let threshold = self.config.collision_threshold;

        let hits: Vec<String> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(other, _)| *other != index)
            .filter(|(_, node)| in_collision(&position, &node.kinematics().position, threshold))
            .map(|(_, node)| node.id().to_string())
            .collect();

        if !hits.is_empty() {
            info!(vehicle = me.id(), with = ?hits, "Collision detected");
            self.collisions += hits.len() as u64;
        }
    }
}

fn check_fleet(fleet: &[VehicleSpec]) -> Result<(), SimulationError> {
    if fleet.len() < 2 {
        return Err(SimulationError::FleetTooSmall(fleet.len()));
    }
    let mut seen = HashSet::new();
    for spec in fleet {
        if !seen.insert(spec.id.as_str()) {
            return Err(SimulationError::DuplicateVehicle(spec.id.clone()));
        }
    }
    Ok(())
}
