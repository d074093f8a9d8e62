//! Configuration model
//!
//! Deserialised from JSON/TOML files or assembled from environment variables
//! by `geosync_infra::config`. Everything except `api.base_url` has a default.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    LOCATION_DISTANCE_INTERVAL_M, LOCATION_TASK_ID, LOCATION_UPDATE_INTERVAL, MIN_SAVE_INTERVAL,
    SYNC_REQUEST_TIMEOUT,
};
use crate::types::{ForegroundNotification, LocationAccuracy, TrackingOptions};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub tracking: TrackingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub location: Option<StaticLocationConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL the `saveLocations` path is appended to.
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), timeout_secs: default_timeout_secs() }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Background task settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default = "default_task_id")]
    pub task_id: String,
    #[serde(default = "default_min_save_interval_secs")]
    pub min_save_interval_secs: u64,
    #[serde(default = "default_update_interval_secs")]
    pub update_interval_secs: u64,
    #[serde(default)]
    pub distance_interval_m: f64,
    #[serde(default)]
    pub accuracy: LocationAccuracy,
    #[serde(default)]
    pub notification: ForegroundNotification,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            task_id: default_task_id(),
            min_save_interval_secs: default_min_save_interval_secs(),
            update_interval_secs: default_update_interval_secs(),
            distance_interval_m: LOCATION_DISTANCE_INTERVAL_M,
            accuracy: LocationAccuracy::default(),
            notification: ForegroundNotification::default(),
        }
    }
}

impl TrackingConfig {
    pub fn min_save_interval(&self) -> Duration {
        Duration::from_secs(self.min_save_interval_secs)
    }

    /// Options handed to the scheduler when updates start.
    pub fn options(&self) -> TrackingOptions {
        TrackingOptions {
            accuracy: self.accuracy,
            time_interval: Duration::from_secs(self.update_interval_secs),
            distance_interval_m: self.distance_interval_m.max(0.0),
            notification: self.notification.clone(),
        }
    }
}

/// Which key-value store backs credentials and the last-save record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    Keychain,
    File,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "keychain" => Ok(Self::Keychain),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown storage backend: {other}")),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// File path for the `file` backend.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default = "default_keychain_service")]
    pub keychain_service: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: StorageBackend::default(), path: None, keychain_service: default_keychain_service() }
    }
}

/// Fixed position reported by hosts without a positioning device.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticLocationConfig {
    pub latitude: f64,
    pub longitude: f64,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_timeout_secs() -> u64 {
    SYNC_REQUEST_TIMEOUT.as_secs()
}

fn default_task_id() -> String {
    LOCATION_TASK_ID.to_string()
}

fn default_min_save_interval_secs() -> u64 {
    MIN_SAVE_INTERVAL.as_secs()
}

fn default_update_interval_secs() -> u64 {
    LOCATION_UPDATE_INTERVAL.as_secs()
}

fn default_keychain_service() -> String {
    "com.geosync.agent".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_json_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "api": { "base_url": "https://hr.example.com/api" } }"#)
                .unwrap();

        assert_eq!(config.api.timeout(), Duration::from_secs(8));
        assert_eq!(config.tracking.min_save_interval(), Duration::from_secs(55));
        assert_eq!(config.tracking.task_id, LOCATION_TASK_ID);
        assert_eq!(config.storage.backend, StorageBackend::Keychain);
        assert!(config.location.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn toml_overrides() {
        let config: Config = toml::from_str(
            r#"
[api]
base_url = "https://hr.example.com/api"
timeout_secs = 3

[tracking]
update_interval_secs = 30
distance_interval_m = 25.0
accuracy = "high"

[storage]
backend = "file"
path = "/var/lib/geosync/store.json"
"#,
        )
        .unwrap();

        let options = config.tracking.options();
        assert_eq!(options.time_interval, Duration::from_secs(30));
        assert_eq!(options.accuracy, LocationAccuracy::High);
        assert!((options.distance_interval_m - 25.0).abs() < f64::EPSILON);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.api.timeout_secs, 3);
    }

    #[test]
    fn storage_backend_parses_case_insensitively() {
        assert_eq!("FILE".parse::<StorageBackend>(), Ok(StorageBackend::File));
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
