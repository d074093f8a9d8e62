//! Location sources for hosts without a platform geolocation service

mod static_source;

pub use static_source::StaticLocationSource;
