use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rand::RngCore;
use thiserror::Error;

use crate::models::Credential;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("This VEID already exists.")]
    DuplicateVeid,
    #[error("Please fill in both fields.")]
    MissingField,
    #[error("Failed to persist credentials: {0}")]
    Persist(#[from] std::io::Error),
}

/// Backing storage for the credential list. Injected so the store's
/// lifecycle (init, mutate, persist) is testable without touching disk.
pub trait CredentialStorage: Send + Sync {
    fn load(&self) -> Result<Vec<Credential>, std::io::Error>;
    fn save(&self, creds: &[Credential]) -> Result<(), std::io::Error>;
}

/// Credentials persisted as a pretty-printed JSON array on disk.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }
}

impl CredentialStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<Credential>, std::io::Error> {
        if !self.path.exists() {
            return Ok(vec![]);
        }
        let text = std::fs::read_to_string(&self.path)?;
        match serde_json::from_str(&text) {
            Ok(creds) => Ok(creds),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), %e, "Could not load credentials from storage");
                Ok(vec![])
            }
        }
    }

    fn save(&self, creds: &[Credential]) -> Result<(), std::io::Error> {
        let text = serde_json::to_string_pretty(creds).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, text)
    }
}

/// Ephemeral storage for tests and `--no-persist` runs.
#[derive(Default)]
pub struct MemoryStorage {
    creds: Mutex<Vec<Credential>>,
}

impl CredentialStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Credential>, std::io::Error> {
        Ok(self.creds.lock().unwrap().clone())
    }

    fn save(&self, creds: &[Credential]) -> Result<(), std::io::Error> {
        *self.creds.lock().unwrap() = creds.to_vec();
        Ok(())
    }
}

pub fn random_credential_id() -> String {
    let mut b = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut b);
    hex::encode(b)
}

/// Source of truth for which accounts are monitored. Loaded from storage at
/// startup and written back after every mutation.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn CredentialStorage>,
    creds: Arc<Mutex<Vec<Credential>>>,
}

impl CredentialStore {
    pub fn open(storage: Arc<dyn CredentialStorage>) -> Self {
        let creds = storage.load().unwrap_or_else(|e| {
            tracing::warn!(%e, "Could not load credentials from storage");
            vec![]
        });
        CredentialStore {
            storage,
            creds: Arc::new(Mutex::new(creds)),
        }
    }

    pub fn list(&self) -> Vec<Credential> {
        self.creds.lock().unwrap().clone()
    }

    pub fn get(&self, id: &str) -> Option<Credential> {
        self.creds.lock().unwrap().iter().find(|c| c.id == id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.creds.lock().unwrap().iter().any(|c| c.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.creds.lock().unwrap().is_empty()
    }

    /// Add a new account. Rejects an existing `veid` without mutating the
    /// store.
    pub fn add(&self, veid: &str, api_key: &str) -> Result<Credential, StoreError> {
        let veid = veid.trim();
        let api_key = api_key.trim();
        if veid.is_empty() || api_key.is_empty() {
            return Err(StoreError::MissingField);
        }
        let mut creds = self.creds.lock().unwrap();
        if creds.iter().any(|c| c.veid == veid) {
            return Err(StoreError::DuplicateVeid);
        }
        let cred = Credential {
            id: random_credential_id(),
            veid: veid.to_string(),
            api_key: api_key.to_string(),
        };
        creds.push(cred.clone());
        self.persist(&creds);
        Ok(cred)
    }

    pub fn remove(&self, id: &str) -> Option<Credential> {
        let mut creds = self.creds.lock().unwrap();
        let pos = creds.iter().position(|c| c.id == id)?;
        let removed = creds.remove(pos);
        self.persist(&creds);
        Some(removed)
    }

    fn persist(&self, creds: &[Credential]) {
        if let Err(e) = self.storage.save(creds) {
            tracing::error!(%e, "Failed to persist credentials");
        }
    }
}
