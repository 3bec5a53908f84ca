pub mod google;
pub mod languages;

pub use google::GoogleTranslator;
pub use languages::{Language, SUPPORTED_LANGUAGES, code_for_name, language_name};

pub type LanguageCode = String;

/// Sentinel source language asking the provider to detect it
pub const AUTO: &str = "auto";

/// Translation provider interface
#[async_trait::async_trait]
pub trait Translator: Send + Sync {
    /// Translate text; `request.from == AUTO` leaves detection to the provider
    async fn translate(&self, request: TranslationRequest) -> Result<Translation, TranslateError>;

    /// Languages offered in selection menus
    fn supported_languages(&self) -> &'static [Language] {
        SUPPORTED_LANGUAGES
    }

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn is_auto_detect(&self) -> bool {
        self.from == AUTO
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub from: LanguageCode,
    pub to: LanguageCode,
    /// Source language the provider detected, only present for auto requests
    pub detected_from: Option<LanguageCode>,
    pub provider: String,
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
    pub free_tier_available: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error("Google API key is not defined.")]
    MissingApiKey,

    #[error("Reason: {0}")]
    ApiError(String),

    #[error("Request failed. Status: {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Failed to parse response: {0}")]
    MalformedResponse(String),

    #[error("No translation found.")]
    NoTranslation,
}
