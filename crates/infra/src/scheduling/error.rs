//! Scheduler error types

use std::time::Duration;

use geosync_domain::GeoSyncError;
use thiserror::Error;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// No handler is bound to the task id
    #[error("no handler defined for task {0}")]
    TaskNotDefined(String),

    /// Task did not stop within the join timeout
    #[error("task {task_id} did not stop within {duration:?}")]
    Timeout { task_id: String, duration: Duration },

    /// Task join failed
    #[error("task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let geo_err = match err {
            SchedulerError::TaskNotDefined(_) => GeoSyncError::Registration(err.to_string()),
            SchedulerError::Timeout { .. } | SchedulerError::TaskJoinFailed(_) => {
                GeoSyncError::Internal(err.to_string())
            }
        };
        InfraError(geo_err)
    }
}

impl From<SchedulerError> for GeoSyncError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
