//! Structured logging setup.
//!
//! Human-readable output by default; JSON lines when `VANET_JSON_LOGS` is set so
//! a log shipper can parse them. The filter accepts any `EnvFilter` directive.

use crate::config::LogConfig;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// # Errors
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed.
pub fn init_logging(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.level)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true);

    if config.json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;
    } else {
        builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install subscriber: {e}"))?;
    }

    tracing::debug!(level = %config.level, json = config.json, "Logging initialized");
    Ok(())
}
