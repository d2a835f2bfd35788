//! Logging initialisation.
//!
//! `RUST_LOG` takes precedence over the configured level. Both initialisers
//! are no-ops when a global subscriber is already installed, so tests may
//! call them repeatedly.

use crate::config::LoggingConfig;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs a human-readable subscriber.
pub fn init_logging(default_level: &str) {
    let installed = fmt()
        .with_env_filter(filter(default_level))
        .with_target(true)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(format = "text", "logging initialised");
    }
}

/// Installs a JSON-lines subscriber.
pub fn init_logging_json(default_level: &str) {
    let installed = fmt()
        .json()
        .with_env_filter(filter(default_level))
        .with_target(true)
        .with_current_span(true)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!(format = "json", "logging initialised");
    }
}

/// Installs the subscriber selected by the logging configuration.
pub fn init_from_config(config: &LoggingConfig) {
    if config.json {
        init_logging_json(&config.level);
    } else {
        init_logging(&config.level);
    }
}

fn filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}
