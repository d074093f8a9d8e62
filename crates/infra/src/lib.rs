//! # GeoSync Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - HTTP client and the `saveLocations` sync client
//! - Key-value stores (OS keychain, JSON file, memory)
//! - The in-process interval task scheduler
//! - A static geolocation provider for headless hosts
//! - Configuration loading and tracing setup
//!
//! ## Architecture
//! - Implements traits defined in `geosync-core`
//! - Contains all "impure" code (I/O, network, OS keychain)

pub mod config;
pub mod errors;
pub mod geolocation;
pub mod http;
pub mod observability;
pub mod scheduling;
pub mod storage;
pub mod sync;

// Re-export commonly used items
pub use errors::InfraError;
pub use geolocation::StaticLocationSource;
pub use http::{HttpClient, HttpClientBuilder};
pub use scheduling::{IntervalSchedulerConfig, IntervalTaskScheduler, SchedulerError};
pub use storage::{build_store, FileStore, KeychainStore, MemoryStore};
pub use sync::LocationSyncClient;
pub use observability::init_tracing;
