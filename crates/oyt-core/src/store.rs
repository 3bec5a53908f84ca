use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

pub const FROM_LANGUAGE_KEY: &str = "fromLanguage";
pub const TO_LANGUAGE_KEY: &str = "toLanguage";

/// Namespaced key for one field preference, e.g. `OYT-title-toLanguage`
pub fn preference_key(persistence_id: &str, key: &str) -> String {
    format!("OYT-{persistence_id}-{key}")
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt preference data: {0}")]
    Corrupt(String),
}

/// Asynchronous string key-value store for language preferences
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Process-local store, forgotten on exit
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[async_trait]
impl PreferenceStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
