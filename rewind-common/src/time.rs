//! Timestamp and unit conversion utilities

use chrono::{DateTime, Utc};

/// Wall-clock stamp carried by every `RewindEvent`
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Convert milliseconds to duration
pub fn millis_to_duration(millis: u64) -> std::time::Duration {
    std::time::Duration::from_millis(millis)
}

/// Convert a setting expressed in seconds to gameplay milliseconds
pub fn seconds_to_ms(seconds: f64) -> f64 {
    seconds * 1000.0
}
