//! Configuration loading
//!
//! Assembles a [`geosync_domain::Config`] from environment variables or a
//! JSON/TOML file.

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, find_config_file, validate};
