use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::presets;
use crate::{ConfigError, FieldConfig};

fn default_poll_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// How often the page URL is compared with the last seen one
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "presets::edit_page_fields")]
    pub edit_fields: Vec<FieldConfig>,
    #[serde(default = "presets::translations_page_fields")]
    pub translations_fields: Vec<FieldConfig>,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            edit_fields: presets::edit_page_fields(),
            translations_fields: presets::translations_page_fields(),
        }
    }
}

impl WatcherConfig {
    pub(crate) fn apply_env(&mut self) {
        if let Some(ms) = env::var("OYT_POLL_INTERVAL_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.poll_interval_ms = ms;
        }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }

        self.edit_fields
            .iter()
            .chain(self.translations_fields.iter())
            .try_for_each(FieldConfig::validate)
    }
}
