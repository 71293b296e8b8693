//! Tracing setup for the querylab CLI
//!
//! Diagnostics go to stderr; stdout is reserved for the run's status lines.
//!
//! Usage:
//!   querylab --debug optimize-queries           # Debug logging (pass round trips, timings)
//!   RUST_LOG=querylab_core=debug querylab ...   # Fine-grained log control
//!
//! Environment variables:
//!   RUST_LOG                                    # Log filter (default: warn)

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (used unless RUST_LOG is explicitly set)
    pub debug: bool,
}

/// Initialize console tracing on stderr
pub fn init(config: &TracingConfig) -> Result<()> {
    let default_level = if config.debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.debug) // Show targets in debug mode
        .with_writer(std::io::stderr)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
