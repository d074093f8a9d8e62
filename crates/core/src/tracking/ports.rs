//! Port interfaces for location tracking
//!
//! These traits define the boundaries between core business logic
//! and infrastructure implementations.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate, Utc};
use geosync_domain::{
    LocationSample, LocationTaskEvent, PermissionStatus, Result, SyncOutcome, SyncPayload,
    TrackingOptions,
};

/// Durable key-value store for credentials and the last-save record
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Read a value, `None` when the key is absent
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write (overwrite) a value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a value; absent keys are not an error
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Trait for delivering one location ping to the remote endpoint
#[async_trait]
pub trait LocationPingSender: Send + Sync {
    /// Post the payload. Only a 2xx answer is `Ok`.
    async fn send(&self, payload: &SyncPayload, auth_token: &str) -> Result<()>;
}

/// Work bound to a task identifier
///
/// Implementations must not fail: everything is reported through the
/// returned [`SyncOutcome`].
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn handle(&self, event: LocationTaskEvent) -> SyncOutcome;
}

/// Platform task-scheduling facility
#[async_trait]
pub trait TaskScheduler: Send + Sync {
    /// Bind `handler` to `task_id`. Calling this again with the same id
    /// replaces the binding; there is never more than one handler per id.
    fn define_task(&self, task_id: &str, handler: Arc<dyn TaskHandler>);

    /// Whether a handler is bound to `task_id`
    fn is_task_defined(&self, task_id: &str) -> bool;

    /// Begin delivering location updates to the task
    async fn start_location_updates(&self, task_id: &str, options: &TrackingOptions)
        -> Result<()>;

    /// Stop delivering location updates to the task
    async fn stop_location_updates(&self, task_id: &str) -> Result<()>;

    /// Running state as the platform reports it
    async fn has_started_location_updates(&self, task_id: &str) -> Result<bool>;
}

/// Location permission prompts
#[async_trait]
pub trait LocationPermissions: Send + Sync {
    async fn request_foreground(&self) -> Result<PermissionStatus>;

    async fn request_background(&self) -> Result<PermissionStatus>;
}

/// Source of position fixes
#[async_trait]
pub trait LocationSource: Send + Sync {
    async fn current_location(&self) -> Result<LocationSample>;
}

/// Wall clock
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Calendar date in the device's configured timezone
    fn local_date(&self) -> NaiveDate {
        self.now().with_timezone(&Local).date_naive()
    }
}

/// Real system clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
