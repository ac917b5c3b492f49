use chrono::{DateTime, Utc};

/// Render a unix timestamp as a UTC date-time string, or a dash when it is
/// missing or out of range.
pub fn format_timestamp(unix: i64) -> String {
    if unix <= 0 {
        return "—".to_string();
    }
    match DateTime::<Utc>::from_timestamp(unix, 0) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "—".to_string(),
    }
}

/// Short time-of-day label for chart axes.
pub fn format_time_short(unix: i64) -> String {
    match DateTime::<Utc>::from_timestamp(unix, 0) {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => String::new(),
    }
}
