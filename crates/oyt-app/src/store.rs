use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use oyt_core::{PreferenceStore, StoreError};
use tokio::fs;
use tokio::sync::Mutex;

/// Language preferences kept in one JSON object on disk.
///
/// The whole map is read once on open and rewritten on every change.
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`; a missing file is an empty store
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match fs::read_to_string(&path).await {
            Ok(data) if data.trim().is_empty() => BTreeMap::new(),
            Ok(data) => serde_json::from_str(&data)
                .map_err(|e| StoreError::Corrupt(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "no preference file yet, starting empty");
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn save(&self, values: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let data = serde_json::to_string_pretty(values)
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;
        fs::write(&self.path, data).await?;
        Ok(())
    }
}

#[async_trait]
impl PreferenceStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self.values.lock().await;
        if values.get(key).map(String::as_str) == Some(value) {
            return Ok(());
        }

        let mut updated = values.clone();
        updated.insert(key.to_string(), value.to_string());
        self.save(&updated).await?;

        *values = updated;
        tracing::debug!(key, value, "preference saved");
        Ok(())
    }
}
