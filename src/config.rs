use std::env;
use std::path::Path;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://api.64clouds.com/v1";
pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_PREFS_FILE: &str = "prefs.json";
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_ACTION_REFRESH_DELAY_SECS: u64 = 5;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_upstream_base_url() -> String {
    sanitize_base_url(
        &env::var("KIWIVM_API_BASE_URL").unwrap_or_else(|_| DEFAULT_UPSTREAM_BASE_URL.to_string()),
    )
}

pub fn get_credentials_file() -> String {
    env::var("KIWIVM_CREDENTIALS_FILE").unwrap_or_else(|_| DEFAULT_CREDENTIALS_FILE.to_string())
}

pub fn get_prefs_file() -> String {
    env::var("KIWIVM_PREFS_FILE").unwrap_or_else(|_| DEFAULT_PREFS_FILE.to_string())
}

pub fn get_refresh_interval_secs() -> u64 {
    env::var("KIWIVM_REFRESH_INTERVAL_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(DEFAULT_REFRESH_INTERVAL_SECS)
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_UPSTREAM_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}
