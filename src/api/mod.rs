// Upstream API surface
pub mod client;
pub mod command;

// Re-export commonly used items
pub use client::{upstream_error, KiwiClient};
pub use command::{Command, LifecycleAction};
