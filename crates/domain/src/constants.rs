//! Application constants
//!
//! Centralized location for the domain-level constants used by the tracking
//! task, the sync executor and the lifecycle controller.

use std::time::Duration;

/// Identifier the background location task is registered under.
pub const LOCATION_TASK_ID: &str = "background-location-task";

/// Minimum spacing between two accepted syncs.
pub const MIN_SAVE_INTERVAL: Duration = Duration::from_secs(55);

/// Deadline for one `saveLocations` request.
pub const SYNC_REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// Nominal cadence requested from the location provider.
pub const LOCATION_UPDATE_INTERVAL: Duration = Duration::from_secs(60);

/// Minimum distance between updates. Zero means the cadence is time based.
pub const LOCATION_DISTANCE_INTERVAL_M: f64 = 0.0;

/// Path of the sync endpoint, relative to the API base URL.
pub const SAVE_LOCATIONS_PATH: &str = "saveLocations";

/// Header carrying the auth token on sync requests.
pub const AUTH_HEADER: &str = "secret_key";

// Secure storage keys
pub const KEY_AUTH_TOKEN: &str = "auth_token";
pub const KEY_USER_ID: &str = "userid";
pub const KEY_CURRENT_DAY_DATE: &str = "currentDayDate";
pub const KEY_LAST_BACKGROUND_SAVE: &str = "lastBackgroundSave";

// Foreground service notification shown while tracking is active
pub const NOTIFICATION_TITLE: &str = "Location tracking active";
pub const NOTIFICATION_BODY: &str = "Your location is being shared with your organisation.";
pub const NOTIFICATION_COLOR: &str = "#4630EB";

/// Format of the `day` field (`YYYY-MM-DD`).
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Format of outgoing timestamps (`YYYY-MM-DDTHH:mm:ss+05:30`).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
