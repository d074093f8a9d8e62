//! Options and status types for location tracking

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::sync::LastSaveRecord;
use crate::constants::{
    LOCATION_DISTANCE_INTERVAL_M, LOCATION_UPDATE_INTERVAL, NOTIFICATION_BODY,
    NOTIFICATION_COLOR, NOTIFICATION_TITLE,
};

/// Accuracy level requested from the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationAccuracy {
    Lowest,
    Low,
    #[default]
    Balanced,
    High,
    Highest,
}

/// Persistent notification shown while sustained background access is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForegroundNotification {
    pub title: String,
    pub body: String,
    pub color: String,
}

impl Default for ForegroundNotification {
    fn default() -> Self {
        Self {
            title: NOTIFICATION_TITLE.to_string(),
            body: NOTIFICATION_BODY.to_string(),
            color: NOTIFICATION_COLOR.to_string(),
        }
    }
}

/// Configuration passed when starting location updates.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingOptions {
    pub accuracy: LocationAccuracy,
    pub time_interval: Duration,
    /// Metres. Zero disables distance filtering.
    pub distance_interval_m: f64,
    pub notification: ForegroundNotification,
}

impl Default for TrackingOptions {
    fn default() -> Self {
        Self {
            accuracy: LocationAccuracy::Balanced,
            time_interval: LOCATION_UPDATE_INTERVAL,
            distance_interval_m: LOCATION_DISTANCE_INTERVAL_M,
            notification: ForegroundNotification::default(),
        }
    }
}

/// Answer to a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

impl PermissionStatus {
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Snapshot for status displays.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingStatus {
    pub active: bool,
    pub last_save: Option<LastSaveRecord>,
}
