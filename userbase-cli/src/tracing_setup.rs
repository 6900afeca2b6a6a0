//! Tracing setup for the userbase binary
//!
//! Usage:
//!   userbase --debug serve            # Debug logging to console
//!   RUST_LOG=userbase_server=debug    # Fine-grained log control
//!
//! With SQL echo enabled the `sqlx::query` target is raised to debug so
//! every statement shows up in the log.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Tracing configuration options
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Enable debug logging (sets RUST_LOG=debug if not already set)
    pub debug: bool,
    /// Log every SQL statement
    pub echo_sql: bool,
}

/// Build the env filter for the given options.
pub fn filter(config: &TracingConfig) -> Result<EnvFilter> {
    let default = if config.debug { "debug" } else { "info" };
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    if config.echo_sql {
        filter = filter.add_directive("sqlx::query=debug".parse()?);
    }

    Ok(filter)
}

/// Initialize console tracing
pub fn init(config: &TracingConfig) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(filter(config)?)
        .with_target(config.debug) // Show targets in debug mode
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}
