// Display-value helpers
pub mod format_bytes;
pub mod format_timestamp;
pub mod percentage;
pub mod status_label;

// Re-export all utilities for convenient access
pub use format_bytes::format_bytes;
pub use format_timestamp::{format_time_short, format_timestamp};
pub use percentage::usage_percent;
pub use status_label::status_label;
