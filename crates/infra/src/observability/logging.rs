//! Tracing subscriber setup
//!
//! `RUST_LOG` wins when set; otherwise `logging.level` from the
//! configuration is the filter. Output goes to stderr, as plain text or
//! one JSON object per line.

use geosync_domain::{GeoSyncError, LoggingConfig, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber.
///
/// # Errors
///
/// Returns `GeoSyncError::Config` for an unparseable level and
/// `GeoSyncError::Internal` if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = build_filter(&config.level)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = if config.json {
        registry
            .with(fmt::layer().json().with_current_span(true).with_writer(std::io::stderr))
            .try_init()
    } else {
        registry.with(fmt::layer().with_target(true).with_writer(std::io::stderr)).try_init()
    };

    installed.map_err(|e| GeoSyncError::Internal(format!("failed to install tracing subscriber: {e}")))
}

fn build_filter(fallback: &str) -> Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback).map_err(|e| {
            GeoSyncError::Config(format!("invalid log level {fallback:?}: {e}"))
        }),
    }
}
