//! Observability infrastructure
//!
//! Structured logging through `tracing`; see [`logging::init_tracing`].

pub mod logging;

pub use logging::init_tracing;
