//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Attempt to load from environment variables
//! 2. Fall back to a file only if `GEOSYNC_API_BASE_URL` is absent; any
//!    other environment error is returned
//! 3. Search the standard locations when no file is given
//! 4. JSON and TOML are both accepted
//!
//! ## Environment Variables
//! - `GEOSYNC_API_BASE_URL` (required): base the `saveLocations` path is joined to
//! - `GEOSYNC_SYNC_TIMEOUT_SECS`: request deadline, default 8
//! - `GEOSYNC_MIN_SAVE_INTERVAL_SECS`: rate-limit floor, default 55
//! - `GEOSYNC_UPDATE_INTERVAL_SECS`: polling interval, default 60
//! - `GEOSYNC_STORAGE_BACKEND`: `keychain` | `file` | `memory`
//! - `GEOSYNC_STORAGE_PATH`: path for the `file` backend
//! - `GEOSYNC_KEYCHAIN_SERVICE`: keychain service name
//! - `GEOSYNC_LATITUDE` / `GEOSYNC_LONGITUDE`: fixed position, both or neither
//! - `GEOSYNC_LOG_JSON`: JSON log lines (true/false)
//!
//! ## File Locations
//! Searched in order, first in the working directory, then beside the
//! executable: `geosync.json`, `geosync.toml`, `config.json`, `config.toml`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use geosync_domain::{
    ApiConfig, Config, GeoSyncError, LoggingConfig, Result, StaticLocationConfig, StorageBackend,
    StorageConfig, TrackingConfig,
};
use url::Url;

const CONFIG_FILE_NAMES: [&str; 4] = ["geosync.json", "geosync.toml", "config.json", "config.toml"];

/// Load configuration with automatic fallback strategy
///
/// Environment variables win whenever `GEOSYNC_API_BASE_URL` is set; their
/// errors are returned as-is. Only an unset base URL falls back to a file.
///
/// # Errors
/// Returns `GeoSyncError::Config` if the chosen source yields no valid
/// configuration.
pub fn load() -> Result<Config> {
    if env_opt("GEOSYNC_API_BASE_URL").is_none() {
        tracing::debug!("GEOSYNC_API_BASE_URL not set, loading configuration from file");
        return load_from_file(None);
    }

    let config = load_from_env()?;
    tracing::info!("configuration loaded from environment variables");
    Ok(config)
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `GeoSyncError::Config` if `GEOSYNC_API_BASE_URL` is missing or
/// any variable holds an invalid value.
pub fn load_from_env() -> Result<Config> {
    let base_url = env_var("GEOSYNC_API_BASE_URL")?;

    let mut api = ApiConfig::new(base_url);
    if let Some(secs) = env_parse::<u64>("GEOSYNC_SYNC_TIMEOUT_SECS")? {
        api.timeout_secs = secs;
    }

    let mut tracking = TrackingConfig::default();
    if let Some(secs) = env_parse::<u64>("GEOSYNC_MIN_SAVE_INTERVAL_SECS")? {
        tracking.min_save_interval_secs = secs;
    }
    if let Some(secs) = env_parse::<u64>("GEOSYNC_UPDATE_INTERVAL_SECS")? {
        tracking.update_interval_secs = secs;
    }

    let mut storage = StorageConfig::default();
    if let Some(raw) = env_opt("GEOSYNC_STORAGE_BACKEND") {
        storage.backend = StorageBackend::from_str(&raw).map_err(GeoSyncError::Config)?;
    }
    storage.path = env_opt("GEOSYNC_STORAGE_PATH");
    if let Some(service) = env_opt("GEOSYNC_KEYCHAIN_SERVICE") {
        storage.keychain_service = service;
    }

    let location = match (
        env_parse::<f64>("GEOSYNC_LATITUDE")?,
        env_parse::<f64>("GEOSYNC_LONGITUDE")?,
    ) {
        (Some(latitude), Some(longitude)) => Some(StaticLocationConfig { latitude, longitude }),
        (None, None) => None,
        _ => {
            return Err(GeoSyncError::Config(
                "GEOSYNC_LATITUDE and GEOSYNC_LONGITUDE must be set together".to_string(),
            ))
        }
    };

    let logging = LoggingConfig { json: env_bool("GEOSYNC_LOG_JSON", false), ..LoggingConfig::default() };

    let config = Config { api, tracking, storage, location, logging };
    validate(&config)?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, searches the standard locations.
///
/// # Errors
/// Returns `GeoSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid or values fail validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(GeoSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => find_config_file().ok_or_else(|| {
            GeoSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| GeoSyncError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, &config_path)?;
    validate(&config)?;
    Ok(config)
}

/// Parse configuration from string content
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| GeoSyncError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| GeoSyncError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(GeoSyncError::Config(format!("Unsupported config format: {}", extension))),
    }
}

/// Search the standard locations for a configuration file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn find_config_file() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    find_in(&dirs)
}

fn find_in(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

/// Check values serde cannot express.
///
/// # Errors
/// Returns `GeoSyncError::Config` naming the first offending field.
pub fn validate(config: &Config) -> Result<()> {
    let url = Url::parse(config.api.base_url.trim()).map_err(|e| {
        GeoSyncError::Config(format!("api.base_url {:?} is not a URL: {}", config.api.base_url, e))
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(GeoSyncError::Config(format!(
            "api.base_url must be http or https, got {}",
            url.scheme()
        )));
    }

    if config.api.timeout_secs == 0 {
        return Err(GeoSyncError::Config("api.timeout_secs must be positive".to_string()));
    }
    if config.tracking.update_interval_secs == 0 {
        return Err(GeoSyncError::Config(
            "tracking.update_interval_secs must be positive".to_string(),
        ));
    }
    if !config.tracking.distance_interval_m.is_finite() || config.tracking.distance_interval_m < 0.0
    {
        return Err(GeoSyncError::Config(
            "tracking.distance_interval_m must be a non-negative number".to_string(),
        ));
    }
    if config.tracking.task_id.trim().is_empty() {
        return Err(GeoSyncError::Config("tracking.task_id must not be empty".to_string()));
    }

    if let Some(location) = &config.location {
        if !(-90.0..=90.0).contains(&location.latitude)
            || !(-180.0..=180.0).contains(&location.longitude)
        {
            return Err(GeoSyncError::Config(format!(
                "location ({}, {}) is out of range",
                location.latitude, location.longitude
            )));
        }
    }

    Ok(())
}

/// Get required environment variable
///
/// # Errors
/// Returns `GeoSyncError::Config` if the variable is not set.
fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        GeoSyncError::Config(format!("Missing required environment variable: {}", key))
    })
}

/// Optional variable; blank counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    env_opt(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| GeoSyncError::Config(format!("Invalid value for {}: {}", key, e)))
        })
        .transpose()
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
