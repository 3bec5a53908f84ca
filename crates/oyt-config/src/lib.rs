use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use self::error::ConfigError;
pub use self::field::{AutoClone, ContentKind, FieldConfig};
pub use self::translator::TranslatorConfig;
pub use self::watcher::WatcherConfig;

pub mod error;
pub mod field;
pub mod presets;
pub mod translator;
pub mod watcher;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub watcher: WatcherConfig,
    /// Where the file-backed preference store keeps language choices
    pub preferences_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translator: TranslatorConfig::default(),
            watcher: WatcherConfig::default(),
            preferences_path: default_preferences_path(),
        }
    }
}

impl Config {
    /// Defaults overridden by `OYT_*` environment variables
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_env();
        config
    }

    /// Load a JSON config file, then apply environment overrides on top
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = serde_json::from_str(&data)?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        self.translator.apply_env();
        self.watcher.apply_env();

        if let Ok(path) = env::var("OYT_PREFERENCES_PATH") {
            self.preferences_path = PathBuf::from(path);
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.translator.validate()?;
        self.watcher.validate()
    }
}

fn default_preferences_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(env::temp_dir)
        .join("oyt")
        .join("preferences.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "translator": { "api_key": "abc" } }"#).unwrap();

        assert_eq!(config.translator.api_key, "abc");
        assert_eq!(config.translator.default_to_language, "tr");
        assert_eq!(config.watcher.poll_interval_ms, 1000);
        assert_eq!(config.watcher.edit_fields.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_api_key_fails_validation() {
        let config = Config::default();
        assert!(matches!(config.validate(), Err(ConfigError::MissingApiKey)));
    }
}
