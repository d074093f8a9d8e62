//! Location samples as delivered by the geolocation provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single position fix.
///
/// Lives only for the duration of one task invocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(latitude: f64, longitude: f64, captured_at: DateTime<Utc>) -> Self {
        Self { latitude, longitude, captured_at }
    }

    /// Great-circle distance to `other` in metres (haversine).
    pub fn distance_to(&self, other: &Self) -> f64 {
        const EARTH_RADIUS_M: f64 = 6_371_008.8;

        let (lat1, lat2) = (self.latitude.to_radians(), other.latitude.to_radians());
        let d_lat = lat2 - lat1;
        let d_lon = (other.longitude - self.longitude).to_radians();

        let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().asin()
    }
}

/// What the scheduler hands to a location task on each invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationTaskEvent {
    /// One or more fixes, oldest first.
    Locations(Vec<LocationSample>),
    /// The provider failed to produce a fix.
    Error(String),
}

impl LocationTaskEvent {
    /// Event carrying a single fix.
    pub fn single(sample: LocationSample) -> Self {
        Self::Locations(vec![sample])
    }
}
