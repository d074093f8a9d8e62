//! In-process task scheduling
//!
//! [`IntervalTaskScheduler`] plays the role of the platform's background
//! task facility on hosts that have none: it keeps the task-id to handler
//! bindings and, while updates are started, polls a location source on a
//! fixed interval and hands each fix to the bound handler.
//!
//! Lifecycle follows the usual runtime rules:
//! - explicit start/stop per task id
//! - join handles for spawned loops
//! - cancellation token per loop
//! - stop waits for the loop under a timeout

pub mod error;
pub mod task_runtime;

pub use error::{SchedulerError, SchedulerResult};
pub use task_runtime::{IntervalSchedulerConfig, IntervalTaskScheduler};
