//! Timestamp and day formatting for outgoing payloads.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Asia::Kolkata;
use geosync_domain::constants::{DAY_FORMAT, TIMESTAMP_FORMAT};

/// `now` rendered in IST regardless of device locale.
pub fn ist_timestamp(now: DateTime<Utc>) -> String {
    now.with_timezone(&Kolkata).format(TIMESTAMP_FORMAT).to_string()
}

/// `YYYY-MM-DD`
pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}
