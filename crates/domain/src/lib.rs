//! # GeoSync Domain
//!
//! Business domain types and models for the location sync agent.
//!
//! This crate contains:
//! - Location, payload and persisted-record types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (intervals, timeouts, storage keys)
//!
//! ## Architecture
//! - No dependencies on other GeoSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
