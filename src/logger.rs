//! Tracing subscriber setup. Call [`init`] once from `main`.

use tracing_subscriber::EnvFilter;

use crate::error::{AppError, Result};

/// Install the global subscriber. `RUST_LOG` takes precedence; `level` is the
/// fallback when it is unset or unparseable.
pub fn init(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| parse_filter(level))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| AppError::LoggerError(format!("failed to set subscriber: {e}")))
}

/// Parse a level or filter directive such as `"info"` or `"page_digest=debug"`.
pub fn parse_filter(level: &str) -> Result<EnvFilter> {
    if level.trim().is_empty() {
        return Err(AppError::LoggerError("log level must not be empty".into()));
    }
    EnvFilter::try_new(level)
        .map_err(|e| AppError::LoggerError(format!("invalid log level '{level}': {e}")))
}
