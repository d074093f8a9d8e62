//! # GeoSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port/adapter interfaces (traits) for storage, HTTP, scheduling and
//!   geolocation
//! - The rate limiter, sync executor and background task handler
//! - The lifecycle controller the host application drives
//!
//! ## Architecture Principles
//! - Only depends on `geosync-domain`
//! - No HTTP, keychain or platform code
//! - All external dependencies via traits

pub mod tracking;

pub use tracking::executor::SyncExecutor;
pub use tracking::lifecycle::LifecycleController;
pub use tracking::limiter::RateLimiter;
pub use tracking::ports::{
    Clock, CredentialStore, LocationPermissions, LocationPingSender, LocationSource,
    SystemClock, TaskHandler, TaskScheduler,
};
pub use tracking::task::{define_location_task, LocationTask};
