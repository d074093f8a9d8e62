//! Start/stop/status operations exposed to the host application.
//!
//! `start` and `stop` are not designed to run concurrently with each other;
//! callers serialise their own requests.

use std::sync::Arc;

use geosync_domain::constants::LOCATION_TASK_ID;
use geosync_domain::{LastSaveRecord, Result, TrackingOptions, TrackingStatus};
use tracing::{error, info, instrument, warn};

use super::ports::{CredentialStore, LocationPermissions, TaskScheduler};
use super::store;

/// Lifecycle controller for background location tracking
pub struct LifecycleController {
    scheduler: Arc<dyn TaskScheduler>,
    permissions: Arc<dyn LocationPermissions>,
    store: Arc<dyn CredentialStore>,
    task_id: String,
    options: TrackingOptions,
}

impl LifecycleController {
    /// Create a controller for the default task id and options
    pub fn new(
        scheduler: Arc<dyn TaskScheduler>,
        permissions: Arc<dyn LocationPermissions>,
        store: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            scheduler,
            permissions,
            store,
            task_id: LOCATION_TASK_ID.to_string(),
            options: TrackingOptions::default(),
        }
    }

    pub fn with_task_id(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = task_id.into();
        self
    }

    pub fn with_options(mut self, options: TrackingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Request permissions and start location updates.
    ///
    /// Returns whether tracking is running afterwards. Already running is a
    /// no-op that returns `true`. A denied background permission degrades to
    /// foreground-only tracking instead of failing.
    #[instrument(skip(self), fields(task_id = %self.task_id))]
    pub async fn start(&self) -> bool {
        if !self.scheduler.is_task_defined(&self.task_id) {
            error!("Location task is not defined; tracking unavailable");
            return false;
        }

        match self.permissions.request_foreground().await {
            Ok(status) if status.is_granted() => {}
            Ok(status) => {
                warn!(?status, "Foreground location permission not granted");
                return false;
            }
            Err(err) => {
                warn!(error = %err, "Foreground location permission request failed");
                return false;
            }
        }

        match self.permissions.request_background().await {
            Ok(status) if status.is_granted() => {}
            Ok(status) => warn!(?status, "Background location permission not granted; foreground only"),
            Err(err) => warn!(error = %err, "Background location permission request failed; foreground only"),
        }

        match self.scheduler.has_started_location_updates(&self.task_id).await {
            Ok(true) => {
                info!("Location updates already running");
                return true;
            }
            Ok(false) => {}
            Err(err) => warn!(error = %err, "Could not query location update state, starting anyway"),
        }

        match self.scheduler.start_location_updates(&self.task_id, &self.options).await {
            Ok(()) => {
                info!(
                    interval_secs = self.options.time_interval.as_secs(),
                    accuracy = ?self.options.accuracy,
                    "Location updates started"
                );
                true
            }
            Err(err) => {
                error!(error = %err, "Failed to start location updates");
                false
            }
        }
    }

    /// Stop location updates. Not running is a no-op returning `true`.
    #[instrument(skip(self), fields(task_id = %self.task_id))]
    pub async fn stop(&self) -> bool {
        let running = match self.scheduler.has_started_location_updates(&self.task_id).await {
            Ok(running) => running,
            Err(err) => {
                error!(error = %err, "Could not query location update state");
                return false;
            }
        };

        if !running {
            info!("Location updates not running");
            return true;
        }

        match self.scheduler.stop_location_updates(&self.task_id).await {
            Ok(()) => {
                info!("Location updates stopped");
                true
            }
            Err(err) => {
                error!(error = %err, "Failed to stop location updates");
                false
            }
        }
    }

    /// Running state as reported by the scheduler.
    pub async fn is_active(&self) -> bool {
        self.scheduler.has_started_location_updates(&self.task_id).await.unwrap_or_else(|err| {
            warn!(error = %err, "Could not query location update state");
            false
        })
    }

    /// Last persisted successful sync, `None` if there is none yet.
    pub async fn last_save_info(&self) -> Option<LastSaveRecord> {
        store::load_last_save(self.store.as_ref()).await.unwrap_or_else(|err| {
            warn!(error = %err, "Could not read last-save record");
            None
        })
    }

    pub async fn status(&self) -> TrackingStatus {
        TrackingStatus { active: self.is_active().await, last_save: self.last_save_info().await }
    }

    /// Remove the last-save record, e.g. on logout.
    pub async fn clear_last_save_info(&self) -> Result<()> {
        store::clear_last_save(self.store.as_ref()).await
    }
}
