use std::sync::Arc;

use anyhow::Context;
use oyt_config::Config;
use oyt_core::PreferenceStore;
use oyt_translator::{GoogleTranslator, Translator};

use crate::store::JsonFileStore;

pub struct AppState {
    pub config: Config,
    pub translator: Arc<dyn Translator>,
    pub store: Arc<dyn PreferenceStore>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let translator = match config.translator.provider.as_str() {
            "google" => GoogleTranslator::new(
                config.translator.api_key.clone(),
                config.translator.api_url.clone(),
            )?,
            other => anyhow::bail!("unsupported translation provider: {other}"),
        };

        let store = JsonFileStore::open(&config.preferences_path)
            .await
            .with_context(|| {
                format!(
                    "failed to open preferences at {}",
                    config.preferences_path.display()
                )
            })?;
        tracing::debug!(path = %store.path().display(), "preference store opened");
        let metadata = translator.metadata();
        tracing::info!(
            provider = %metadata.name,
            requires_api_key = metadata.requires_api_key,
            free_tier = metadata.free_tier_available,
            "translator ready"
        );

        Ok(Self {
            config,
            translator: Arc::new(translator),
            store: Arc::new(store),
        })
    }
}
