//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for GeoSync
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum GeoSyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Operation timed out after {millis}ms")]
    Timeout { millis: u64 },

    #[error("Permission error: {0}")]
    Permission(String),

    #[error("Task registration error: {0}")]
    Registration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl GeoSyncError {
    /// Build a timeout error from a [`std::time::Duration`].
    pub fn timeout(duration: std::time::Duration) -> Self {
        Self::Timeout { millis: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX) }
    }
}

impl From<serde_json::Error> for GeoSyncError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for GeoSync operations
pub type Result<T> = std::result::Result<T, GeoSyncError>;
