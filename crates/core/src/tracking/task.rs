//! The background location task and its registration.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use geosync_domain::{FailureReason, LocationTaskEvent, SyncOutcome};
use tracing::{debug, error, info, warn};

use super::executor::SyncExecutor;
use super::ports::{TaskHandler, TaskScheduler};

/// Handler bound to the location task id.
///
/// Uses only the first sample of a batch. Errors from the provider, the
/// store or the network are reported in the outcome; a panic inside the
/// executor is caught here so the scheduler never sees one.
pub struct LocationTask {
    executor: Arc<SyncExecutor>,
}

impl LocationTask {
    pub fn new(executor: Arc<SyncExecutor>) -> Self {
        Self { executor }
    }

    pub fn executor(&self) -> &Arc<SyncExecutor> {
        &self.executor
    }

    async fn run(&self, event: LocationTaskEvent) -> SyncOutcome {
        let samples = match event {
            LocationTaskEvent::Error(message) => {
                error!(error = %message, "Location task received provider error");
                return SyncOutcome::Failed(FailureReason::Provider(message));
            }
            LocationTaskEvent::Locations(samples) => samples,
        };

        let Some(sample) = samples.first() else {
            debug!("Location task received an empty batch");
            return SyncOutcome::Failed(FailureReason::NoLocation);
        };

        if samples.len() > 1 {
            debug!(count = samples.len(), "Batch contains several samples, using the first");
        }

        self.executor.sync(sample).await
    }
}

#[async_trait]
impl TaskHandler for LocationTask {
    async fn handle(&self, event: LocationTaskEvent) -> SyncOutcome {
        let outcome = AssertUnwindSafe(self.run(event))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                let message = panic_message(panic.as_ref());
                error!(panic = %message, "Location task panicked");
                SyncOutcome::Failed(FailureReason::Internal(format!("handler panicked: {message}")))
            });

        log_outcome(&outcome);
        outcome
    }
}

/// Bind `task` to `task_id`. Safe to call repeatedly.
pub fn define_location_task(scheduler: &dyn TaskScheduler, task_id: &str, task: Arc<LocationTask>) {
    if scheduler.is_task_defined(task_id) {
        debug!(task_id, "Location task already defined, replacing handler");
    }
    scheduler.define_task(task_id, task);
}

fn log_outcome(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Success(_) => debug!(outcome = outcome.label(), "Location task finished"),
        SyncOutcome::SkippedRateLimit { .. } => {
            debug!(outcome = outcome.label(), "Location task finished");
        }
        SyncOutcome::SkippedNoCredentials => {
            info!(outcome = outcome.label(), "Location task finished without credentials");
        }
        SyncOutcome::Failed(reason) => {
            warn!(outcome = outcome.label(), reason = %reason, "Location task finished with failure");
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    panic
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
