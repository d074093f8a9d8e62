//! Interval-driven task runtime.
//!
//! Binds task ids to [`TaskHandler`]s and, for every started task, runs one
//! loop that polls a [`LocationSource`] every `time_interval` and delivers
//! the fix to the handler bound at delivery time.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use geosync_core::TaskScheduler;
//! use geosync_domain::{StaticLocationConfig, TrackingOptions};
//! use geosync_infra::{IntervalTaskScheduler, StaticLocationSource};
//!
//! # async fn example(handler: Arc<dyn geosync_core::TaskHandler>) -> geosync_domain::Result<()> {
//! let source = Arc::new(StaticLocationSource::from(StaticLocationConfig {
//!     latitude: 12.9716,
//!     longitude: 77.5946,
//! }));
//! let scheduler = IntervalTaskScheduler::new(source);
//!
//! scheduler.define_task("background-location-task", handler);
//! scheduler
//!     .start_location_updates("background-location-task", &TrackingOptions::default())
//!     .await?;
//! // ... application runs ...
//! scheduler.stop_location_updates("background-location-task").await?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use geosync_core::{LocationSource, TaskHandler, TaskScheduler};
use geosync_domain::{
    LocationSample, LocationTaskEvent, Result, SyncOutcome, TrackingOptions,
};
use parking_lot::RwLock;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Shortest polling period accepted; smaller intervals are raised to this.
const MIN_TIME_INTERVAL: Duration = Duration::from_secs(1);

type HandlerMap = Arc<RwLock<HashMap<String, Arc<dyn TaskHandler>>>>;

/// Configuration for [`IntervalTaskScheduler`]
#[derive(Debug, Clone)]
pub struct IntervalSchedulerConfig {
    /// How long `stop` waits for a loop to wind down
    pub join_timeout: Duration,
    /// Deliver the first fix as soon as updates start instead of after one
    /// interval
    pub fire_immediately: bool,
}

impl Default for IntervalSchedulerConfig {
    fn default() -> Self {
        Self { join_timeout: Duration::from_secs(5), fire_immediately: true }
    }
}

struct RunningTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
    options: TrackingOptions,
}

/// Context for one update loop
struct LoopContext {
    task_id: String,
    source: Arc<dyn LocationSource>,
    handlers: HandlerMap,
    options: TrackingOptions,
    fire_immediately: bool,
}

/// In-process [`TaskScheduler`]
pub struct IntervalTaskScheduler {
    source: Arc<dyn LocationSource>,
    config: IntervalSchedulerConfig,
    handlers: HandlerMap,
    running: Mutex<HashMap<String, RunningTask>>,
}

impl IntervalTaskScheduler {
    pub fn new(source: Arc<dyn LocationSource>) -> Self {
        Self::with_config(source, IntervalSchedulerConfig::default())
    }

    pub fn with_config(source: Arc<dyn LocationSource>, config: IntervalSchedulerConfig) -> Self {
        Self {
            source,
            config,
            handlers: Arc::new(RwLock::new(HashMap::new())),
            running: Mutex::new(HashMap::new()),
        }
    }

    /// Invoke the handler bound to `task_id` once with `event`, outside
    /// the polling loop.
    ///
    /// # Errors
    ///
    /// Returns `GeoSyncError::Registration` if no handler is bound.
    #[instrument(skip(self, event))]
    pub async fn dispatch(&self, task_id: &str, event: LocationTaskEvent) -> Result<SyncOutcome> {
        let handler = self
            .handler(task_id)
            .ok_or_else(|| SchedulerError::TaskNotDefined(task_id.to_string()))?;
        Ok(handler.handle(event).await)
    }

    /// Options the running loop for `task_id` was started with.
    pub async fn running_options(&self, task_id: &str) -> Option<TrackingOptions> {
        self.running.lock().await.get(task_id).map(|task| task.options.clone())
    }

    fn handler(&self, task_id: &str) -> Option<Arc<dyn TaskHandler>> {
        self.handlers.read().get(task_id).cloned()
    }

    async fn shutdown(&self, task_id: &str, task: RunningTask) -> SchedulerResult<()> {
        task.cancel.cancel();

        let join_timeout = self.config.join_timeout;
        match tokio::time::timeout(join_timeout, task.handle).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(SchedulerError::TaskJoinFailed(err.to_string())),
            Err(_) => Err(SchedulerError::Timeout {
                task_id: task_id.to_string(),
                duration: join_timeout,
            }),
        }
    }

    /// Background update loop
    async fn update_loop(ctx: LoopContext, cancel: CancellationToken) {
        let LoopContext { task_id, source, handlers, options, fire_immediately } = ctx;

        let period = options.time_interval.max(MIN_TIME_INTERVAL);
        let first = if fire_immediately { Instant::now() } else { Instant::now() + period };
        let mut ticker = tokio::time::interval_at(first, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut last_delivered: Option<LocationSample> = None;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(task_id = %task_id, "update loop cancelled");
                    break;
                }
                _ = ticker.tick() => {}
            }

            let fix = tokio::select! {
                _ = cancel.cancelled() => break,
                fix = source.current_location() => fix,
            };

            let event = match fix {
                Ok(sample) => {
                    if within_distance(last_delivered.as_ref(), &sample, options.distance_interval_m)
                    {
                        debug!(task_id = %task_id, "fix within distance interval, not delivered");
                        continue;
                    }
                    last_delivered = Some(sample);
                    LocationTaskEvent::single(sample)
                }
                Err(err) => {
                    warn!(task_id = %task_id, error = %err, "location source failed");
                    LocationTaskEvent::Error(err.to_string())
                }
            };

            let handler = handlers.read().get(&task_id).cloned();
            let Some(handler) = handler else {
                warn!(task_id = %task_id, "no handler bound, dropping location update");
                continue;
            };

            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(task_id = %task_id, "update loop cancelled during delivery");
                    break;
                }
                outcome = handler.handle(event) => {
                    debug!(task_id = %task_id, outcome = outcome.label(), "location update delivered");
                }
            }
        }
    }
}

fn within_distance(previous: Option<&LocationSample>, next: &LocationSample, min_m: f64) -> bool {
    match previous {
        Some(prev) if min_m > 0.0 => prev.distance_to(next) < min_m,
        _ => false,
    }
}

#[async_trait]
impl TaskScheduler for IntervalTaskScheduler {
    fn define_task(&self, task_id: &str, handler: Arc<dyn TaskHandler>) {
        let replaced = self.handlers.write().insert(task_id.to_string(), handler).is_some();
        debug!(task_id, replaced, "task defined");
    }

    fn is_task_defined(&self, task_id: &str) -> bool {
        self.handlers.read().contains_key(task_id)
    }

    #[instrument(skip(self, options))]
    async fn start_location_updates(
        &self,
        task_id: &str,
        options: &TrackingOptions,
    ) -> Result<()> {
        if !self.is_task_defined(task_id) {
            return Err(SchedulerError::TaskNotDefined(task_id.to_string()).into());
        }

        let mut running = self.running.lock().await;

        if let Some(previous) = running.remove(task_id) {
            info!(task_id, "restarting location updates with new options");
            if let Err(err) = self.shutdown(task_id, previous).await {
                warn!(task_id, error = %err, "previous update loop did not stop cleanly");
            }
        }

        let cancel = CancellationToken::new();
        let ctx = LoopContext {
            task_id: task_id.to_string(),
            source: Arc::clone(&self.source),
            handlers: Arc::clone(&self.handlers),
            options: options.clone(),
            fire_immediately: self.config.fire_immediately,
        };
        let loop_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            Self::update_loop(ctx, loop_cancel).await;
        });

        running.insert(
            task_id.to_string(),
            RunningTask { cancel, handle, options: options.clone() },
        );

        info!(
            task_id,
            interval_secs = options.time_interval.as_secs(),
            distance_m = options.distance_interval_m,
            "location updates started"
        );
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop_location_updates(&self, task_id: &str) -> Result<()> {
        let Some(task) = self.running.lock().await.remove(task_id) else {
            debug!(task_id, "location updates already stopped");
            return Ok(());
        };

        self.shutdown(task_id, task).await?;
        info!(task_id, "location updates stopped");
        Ok(())
    }

    async fn has_started_location_updates(&self, task_id: &str) -> Result<bool> {
        Ok(self
            .running
            .lock()
            .await
            .get(task_id)
            .is_some_and(|task| !task.handle.is_finished()))
    }
}

impl Drop for IntervalTaskScheduler {
    fn drop(&mut self) {
        for task in self.running.get_mut().values() {
            task.cancel.cancel();
        }
    }
}
