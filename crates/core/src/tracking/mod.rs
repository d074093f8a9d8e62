//! Background location tracking and periodic sync
//!
//! Control flow per scheduler event:
//! `TaskScheduler` → [`task::LocationTask`] → [`limiter::RateLimiter`] →
//! [`executor::SyncExecutor`] → `LocationPingSender` → `lastBackgroundSave`.

pub mod executor;
pub mod lifecycle;
pub mod limiter;
pub mod ports;
pub mod store;
pub mod task;
pub mod timefmt;
