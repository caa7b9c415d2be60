//! Structured logging setup for applications embedding SCOUT.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Set (to any value) to switch to JSON log lines.
pub const JSON_LOG_ENV: &str = "SCOUT_LOG_JSON";

/// Install the global `tracing` subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `scout=info`. Fails if a
/// global subscriber is already installed.
pub fn init(json: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scout=info"));

    let result = if json {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init()
    } else {
        fmt().with_env_filter(env_filter).with_target(true).try_init()
    };

    result.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))
}

/// Like [`init`], choosing JSON output from `SCOUT_LOG_JSON`.
pub fn init_from_env() -> Result<()> {
    init(std::env::var(JSON_LOG_ENV).is_ok())
}
