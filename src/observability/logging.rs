//! # Structured Logging
//!
//! Tracing subscriber initialization. `RUST_LOG` wins when set; otherwise
//! the configured default filter applies. JSON output is used in
//! deployments where logs are shipped to a structured pipeline.

use crate::config::ObservabilitySettings;
use crate::errors::{GrapevineError, Result};
use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Safe to call once per process; a second call returns an error from the
/// underlying subscriber registry.
pub fn init_tracing(settings: &ObservabilitySettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.log_level));

    let result = if settings.json_logs {
        tracing_subscriber::fmt().with_env_filter(filter).json().try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init()
    };

    result.map_err(|e| GrapevineError::config(format!("Failed to initialize tracing: {}", e)))
}
