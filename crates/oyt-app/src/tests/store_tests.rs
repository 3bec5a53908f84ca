use std::path::PathBuf;

use oyt_core::{PreferenceStore, StoreError};
use uuid::Uuid;

use crate::store::JsonFileStore;

fn temp_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("oyt-test-{}", Uuid::new_v4()))
        .join("preferences.json")
}

#[tokio::test]
async fn missing_file_opens_empty() {
    let store = JsonFileStore::open(temp_path()).await.unwrap();

    assert_eq!(store.get("OYT-title-toLanguage").await.unwrap(), None);
}

#[tokio::test]
async fn values_survive_reopening() {
    let path = temp_path();

    let store = JsonFileStore::open(&path).await.unwrap();
    store.set("OYT-title-fromLanguage", "en").await.unwrap();
    store.set("OYT-title-toLanguage", "tr").await.unwrap();
    store.set("OYT-title-toLanguage", "de").await.unwrap();
    drop(store);

    let reopened = JsonFileStore::open(&path).await.unwrap();
    assert_eq!(
        reopened.get("OYT-title-fromLanguage").await.unwrap().as_deref(),
        Some("en")
    );
    assert_eq!(
        reopened.get("OYT-title-toLanguage").await.unwrap().as_deref(),
        Some("de")
    );

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["OYT-title-toLanguage"], "de");

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[tokio::test]
async fn corrupt_file_is_reported() {
    let path = temp_path();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();

    let result = JsonFileStore::open(&path).await;
    assert!(matches!(result, Err(StoreError::Corrupt(_))));

    std::fs::remove_dir_all(path.parent().unwrap()).unwrap();
}

#[tokio::test]
async fn failed_save_is_retried_on_the_next_set() {
    let path = temp_path();
    let dir = path.parent().unwrap().to_path_buf();
    let store = JsonFileStore::open(&path).await.unwrap();

    // A plain file where the directory should be makes the write fail
    std::fs::write(&dir, "in the way").unwrap();
    assert!(store.set("OYT-title-toLanguage", "de").await.is_err());
    assert_eq!(store.get("OYT-title-toLanguage").await.unwrap(), None);

    std::fs::remove_file(&dir).unwrap();
    store.set("OYT-title-toLanguage", "de").await.unwrap();

    let on_disk: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(on_disk["OYT-title-toLanguage"], "de");

    std::fs::remove_dir_all(&dir).unwrap();
}
