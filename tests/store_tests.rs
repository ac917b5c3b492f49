use std::sync::Arc;

use kiwidash::services::{CredentialStore, JsonFileStorage, MemoryStorage, StoreError};

fn memory_store() -> CredentialStore {
    CredentialStore::open(Arc::new(MemoryStorage::default()))
}

#[test]
fn test_add_generates_unique_ids() {
    let store = memory_store();
    let a = store.add("100", "key-a").unwrap();
    let b = store.add("200", "key-b").unwrap();
    assert_ne!(a.id, b.id);
    assert_eq!(store.list().len(), 2);
}

#[test]
fn test_add_rejects_duplicate_veid_without_mutating() {
    let store = memory_store();
    store.add("100", "key-a").unwrap();
    let err = store.add("100", "other-key").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateVeid));
    let creds = store.list();
    assert_eq!(creds.len(), 1);
    assert_eq!(creds[0].api_key, "key-a");
}

#[test]
fn test_add_rejects_empty_fields() {
    let store = memory_store();
    assert!(matches!(store.add("", "key"), Err(StoreError::MissingField)));
    assert!(matches!(store.add("100", "  "), Err(StoreError::MissingField)));
    assert!(store.is_empty());
}

#[test]
fn test_add_trims_whitespace() {
    let store = memory_store();
    let cred = store.add(" 100 ", " key ").unwrap();
    assert_eq!(cred.veid, "100");
    assert_eq!(cred.api_key, "key");
}

#[test]
fn test_remove_unknown_id_is_noop() {
    let store = memory_store();
    store.add("100", "key").unwrap();
    assert!(store.remove("nope").is_none());
    assert_eq!(store.list().len(), 1);
}

#[test]
fn test_memory_storage_survives_reopen() {
    let storage = Arc::new(MemoryStorage::default());
    let store = CredentialStore::open(storage.clone());
    let cred = store.add("100", "key").unwrap();

    let reopened = CredentialStore::open(storage);
    assert_eq!(reopened.list().len(), 1);
    assert!(reopened.contains(&cred.id));
}

#[test]
fn test_json_file_storage_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");

    let store = CredentialStore::open(Arc::new(JsonFileStorage::new(&path)));
    let a = store.add("100", "key-a").unwrap();
    store.add("200", "key-b").unwrap();
    store.remove(&a.id);

    let reopened = CredentialStore::open(Arc::new(JsonFileStorage::new(&path)));
    let creds = reopened.list();
    assert_eq!(creds.len(), 1);
    assert_eq!(creds[0].veid, "200");
}

#[test]
fn test_json_file_storage_missing_file_yields_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.json");
    let store = CredentialStore::open(Arc::new(JsonFileStorage::new(path)));
    assert!(store.is_empty());
}

#[test]
fn test_json_file_storage_tolerates_malformed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("credentials.json");
    std::fs::write(&path, "{not json").unwrap();
    let store = CredentialStore::open(Arc::new(JsonFileStorage::new(path)));
    assert!(store.is_empty());
}
