pub mod monitor;
pub mod prefs;
pub mod store;

pub use monitor::{Monitor, MonitorConfig};
pub use prefs::{load_lookback, save_lookback};
pub use store::{
    random_credential_id, CredentialStorage, CredentialStore, JsonFileStorage, MemoryStorage,
    StoreError,
};
