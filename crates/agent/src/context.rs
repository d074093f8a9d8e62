//! Agent context - wires infra adapters into the core services

use std::sync::Arc;

use anyhow::{Context, Result};
use geosync_core::{
    define_location_task, LifecycleController, LocationTask, RateLimiter, SyncExecutor,
    SystemClock, TaskScheduler,
};
use geosync_domain::Config;
use geosync_infra::{build_store, IntervalTaskScheduler, LocationSyncClient, StaticLocationSource};

/// Everything the agent keeps alive while tracking
pub struct AgentContext {
    pub config: Config,
    pub controller: LifecycleController,
}

impl AgentContext {
    pub fn new(config: Config) -> Result<Self> {
        let location = config.location.context(
            "a fixed position is required: set location.latitude/longitude or GEOSYNC_LATITUDE/GEOSYNC_LONGITUDE",
        )?;

        let store = build_store(&config.storage).context("failed to open credential store")?;
        let client = LocationSyncClient::new(&config.api).context("failed to build sync client")?;
        let source = Arc::new(StaticLocationSource::from(location));

        let limiter = Arc::new(RateLimiter::new(config.tracking.min_save_interval()));
        let executor = Arc::new(
            SyncExecutor::new(Arc::clone(&store), Arc::new(client), limiter, Arc::new(SystemClock))
                .with_request_timeout(config.api.timeout()),
        );

        let scheduler = Arc::new(IntervalTaskScheduler::new(source.clone()));
        define_location_task(
            scheduler.as_ref(),
            &config.tracking.task_id,
            Arc::new(LocationTask::new(executor)),
        );

        let scheduler: Arc<dyn TaskScheduler> = scheduler;
        let controller = LifecycleController::new(scheduler, source, store)
            .with_task_id(config.tracking.task_id.clone())
            .with_options(config.tracking.options());

        Ok(Self { config, controller })
    }
}

#[cfg(test)]
mod tests {
    use geosync_domain::{
        ApiConfig, LoggingConfig, StaticLocationConfig, StorageBackend, StorageConfig,
        TrackingConfig,
    };

    use super::*;

    fn config(location: Option<StaticLocationConfig>) -> Config {
        Config {
            api: ApiConfig::new("https://hr.example.com/api"),
            tracking: TrackingConfig { task_id: "agent-test-task".into(), ..TrackingConfig::default() },
            storage: StorageConfig { backend: StorageBackend::Memory, ..StorageConfig::default() },
            location,
            logging: LoggingConfig::default(),
        }
    }

    #[test]
    fn requires_fixed_position() {
        let err = AgentContext::new(config(None)).err().expect("missing location must fail");
        assert!(err.to_string().contains("fixed position"));
    }

    #[tokio::test]
    async fn wires_controller_for_configured_task() {
        let location = StaticLocationConfig { latitude: 12.9716, longitude: 77.5946 };
        let ctx = AgentContext::new(config(Some(location))).expect("context should build");

        assert_eq!(ctx.controller.task_id(), "agent-test-task");
        assert!(!ctx.controller.is_active().await);
        assert!(ctx.controller.last_save_info().await.is_none());
    }
}
