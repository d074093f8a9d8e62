//! Remote sync clients
//!
//! - `LocationSyncClient`: posts location pings to `saveLocations`

pub mod location_client;

pub use location_client::LocationSyncClient;
