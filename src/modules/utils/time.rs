use chrono::{DateTime, Utc};
use std::time::{SystemTime, UNIX_EPOCH};

/// Function to get the current Unix timestamp in milliseconds
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Function to format a millisecond timestamp into a human-readable string
pub fn format_millis(timestamp_ms: u64) -> String {
    let datetime: DateTime<Utc> =
        DateTime::from_timestamp_millis(timestamp_ms as i64).unwrap_or_default();
    datetime.format("%Y-%m-%d %H:%M:%S").to_string()
}
