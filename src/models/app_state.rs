use std::sync::{Arc, Mutex};

use crate::models::usage::LookbackWindow;
use crate::services::monitor::Monitor;

/// Shared axum state. The monitor owns the credential store and all
/// per-credential runtime state; everything here is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub monitor: Monitor,
    /// Persisted chart lookback preference.
    pub lookback: Arc<Mutex<LookbackWindow>>,
    pub prefs_path: String,
    /// One-shot messages shown on the next dashboard render.
    pub flash_store: Arc<Mutex<Vec<String>>>,
    pub custom_css: Option<String>,
}

impl AppState {
    pub fn push_flash(&self, msg: impl Into<String>) {
        self.flash_store.lock().unwrap().push(msg.into());
    }

    pub fn take_flash_messages(&self) -> Vec<String> {
        std::mem::take(&mut *self.flash_store.lock().unwrap())
    }
}
