use std::env;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_provider() -> String {
    "google".to_string()
}

fn default_api_url() -> String {
    "https://translation.googleapis.com/language/translate/v2".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Target language used by the CLI when none is given
    #[serde(default = "crate::field::default_to_language")]
    pub default_to_language: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
            api_url: default_api_url(),
            default_to_language: crate::field::default_to_language(),
        }
    }
}

impl TranslatorConfig {
    pub(crate) fn apply_env(&mut self) {
        if let Ok(key) = env::var("OYT_GOOGLE_API_KEY").or_else(|_| env::var("GOOGLE_API_KEY")) {
            self.api_key = key;
        }

        if let Ok(url) = env::var("OYT_TRANSLATE_API_URL") {
            self.api_url = url;
        }

        if let Ok(lang) = env::var("OYT_DEFAULT_TO_LANGUAGE") {
            self.default_to_language = lang;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(())
    }
}
