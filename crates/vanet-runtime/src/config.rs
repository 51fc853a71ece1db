//! # Runtime Configuration
//!
//! Unified configuration for the simulation run and the protocol core.
//!
//! All values have defaults matching the reference scenario and can be
//! overridden from `VANET_*` environment variables.

use std::env;
use std::str::FromStr;
use thiserror::Error;
use vanet_auth::{AuthConfig, AuthError, KeySource};

/// Configuration errors. Any of these stops the runtime before a node is built.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable held an unparseable value
    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },

    /// Simulation must run at least one step
    #[error("simulation needs at least one step")]
    ZeroSteps,

    /// Step duration must be positive and finite
    #[error("step duration must be positive, got {0}")]
    InvalidStepDuration(f64),

    /// Collision threshold must be non-negative and finite
    #[error("collision threshold must be non-negative, got {0}")]
    InvalidCollisionThreshold(f64),

    /// Protocol configuration fault
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Simulation parameters.
    pub simulation: SimulationConfig,
    /// Logging parameters.
    pub logging: LogConfig,
    /// Protocol parameters.
    pub auth: AuthConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            logging: LogConfig::default(),
            auth: AuthConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load every section from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            simulation: SimulationConfig::from_env()?,
            logging: LogConfig::from_env(),
            auth: AuthConfig::from_env()?,
        })
    }

    /// Reject unusable settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.simulation.validate()?;
        self.auth.validate()?;
        Ok(())
    }
}

/// Simulation configuration.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Number of simulation steps.
    pub steps: u32,
    /// Step duration in seconds.
    pub dt: f64,
    /// Vehicles closer than this are reported as colliding.
    pub collision_threshold: f64,
    /// Seeds key generation and mobility; OS entropy when unset.
    pub seed: Option<u64>,
    /// Overwrite the speed of every Nth broadcast in transit (0 = never).
    pub tamper_every: u64,
    /// Print the final report as JSON instead of a table.
    pub report_json: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            steps: 100,
            dt: 0.1,
            collision_threshold: 1.0,
            seed: None,
            tamper_every: 0,
            report_json: false,
        }
    }
}

impl SimulationConfig {
    /// Environment overrides:
    ///
    /// - `VANET_STEPS` (default 100)
    /// - `VANET_DT` (default 0.1)
    /// - `VANET_COLLISION_THRESHOLD` (default 1.0)
    /// - `VANET_SEED` (default unset)
    /// - `VANET_TAMPER_EVERY` (default 0)
    /// - `VANET_REPORT_JSON` (default false)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            steps: parse_var("VANET_STEPS")?.unwrap_or(defaults.steps),
            dt: parse_var("VANET_DT")?.unwrap_or(defaults.dt),
            collision_threshold: parse_var("VANET_COLLISION_THRESHOLD")?
                .unwrap_or(defaults.collision_threshold),
            seed: parse_var("VANET_SEED")?,
            tamper_every: parse_var("VANET_TAMPER_EVERY")?.unwrap_or(defaults.tamper_every),
            report_json: env::var("VANET_REPORT_JSON")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.report_json),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.steps == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidStepDuration(self.dt));
        }
        if !self.collision_threshold.is_finite() || self.collision_threshold < 0.0 {
            return Err(ConfigError::InvalidCollisionThreshold(
                self.collision_threshold,
            ));
        }
        Ok(())
    }

    /// Key material source for this run.
    pub fn key_source(&self) -> KeySource {
        match self.seed {
            Some(seed) => KeySource::Seeded(seed),
            None => KeySource::OsEntropy,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Filter directive (trace, debug, info, warn, error, or a full EnvFilter string)
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LogConfig {
    /// - `VANET_LOG_LEVEL` or `RUST_LOG`: filter (default: info)
    /// - `VANET_JSON_LOGS`: JSON output (default: false)
    pub fn from_env() -> Self {
        Self {
            level: env::var("VANET_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),
            json: env::var("VANET_JSON_LOGS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
        Err(_) => Ok(None),
    }
}
