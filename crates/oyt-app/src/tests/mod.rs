use async_trait::async_trait;
use oyt_translator::{
    ProviderMetadata, TranslateError, Translation, TranslationRequest, Translator,
};

mod oneshot_tests;
mod session_tests;
mod store_tests;

/// Uppercases the text instead of calling out to a provider
pub struct ShoutTranslator;

#[async_trait]
impl Translator for ShoutTranslator {
    async fn translate(&self, request: TranslationRequest) -> Result<Translation, TranslateError> {
        Ok(Translation {
            text: request.text.to_uppercase(),
            detected_from: request.is_auto_detect().then(|| "en".to_string()),
            from: request.from,
            to: request.to,
            provider: "shout".to_string(),
        })
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "shout".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}
