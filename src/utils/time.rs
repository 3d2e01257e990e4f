//! Conversions between wall-clock instants and epoch-second floats

use chrono::{DateTime, Utc};

/// Epoch seconds with millisecond resolution, as stored in `targetTimestamp`
pub fn epoch_seconds(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / 1000.0
}

/// Inverse of [`epoch_seconds`]; `None` for non-finite or out-of-range values
pub fn from_epoch_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
}
