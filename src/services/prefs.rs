use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::models::LookbackWindow;

#[derive(Serialize, Deserialize, Default)]
struct Prefs {
    lookback: LookbackWindow,
}

/// Load the persisted chart lookback window, defaulting when the file is
/// missing or unreadable.
pub fn load_lookback(path: &str) -> LookbackWindow {
    let path = Path::new(path);
    if !path.exists() {
        return LookbackWindow::default();
    }
    match std::fs::read_to_string(path) {
        Ok(text) => serde_json::from_str::<Prefs>(&text)
            .map(|p| p.lookback)
            .unwrap_or_default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), %e, "Could not load preferences");
            LookbackWindow::default()
        }
    }
}

pub fn save_lookback(path: &str, lookback: LookbackWindow) -> Result<(), std::io::Error> {
    let text = serde_json::to_string_pretty(&Prefs { lookback }).map_err(std::io::Error::other)?;
    std::fs::write(path, text)
}
