use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How a field's content is read and written on the page.
///
/// Plain-text inputs (textareas) expose their value as text, while the
/// rich textboxes of the edit page hold markup with `<br>` line breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Text,
    #[default]
    Markup,
}

/// Copy initial content from another element when the tracked input is empty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoClone {
    pub selector: String,
    #[serde(default)]
    pub content_kind: ContentKind,
}

fn default_debounce_ms() -> u64 {
    1000
}

fn default_mount_depth() -> usize {
    4
}

pub(crate) fn default_from_language() -> String {
    "auto".to_string()
}

pub(crate) fn default_to_language() -> String {
    "tr".to_string()
}

fn default_auto_language_label() -> String {
    "Detect Language".to_string()
}

fn default_max_attempts() -> Option<u32> {
    Some(10)
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_initial_translation_delay_ms() -> u64 {
    200
}

fn default_candidate_limit() -> usize {
    50
}

fn default_liveness_interval_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Selector locating the editable element
    pub input_selector: String,
    /// Key under which language choices are remembered; nothing is stored without it
    pub persistence_id: Option<String>,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// How many parents above the input the output panel is mounted on
    #[serde(default = "default_mount_depth")]
    pub mount_depth: usize,
    pub content_kind: ContentKind,
    #[serde(default = "default_from_language")]
    pub default_from_language: String,
    #[serde(default = "default_to_language")]
    pub default_to_language: String,
    #[serde(default = "default_auto_language_label")]
    pub auto_language_label: String,
    /// `None` keeps retrying forever
    #[serde(default = "default_max_attempts")]
    pub max_attempts: Option<u32>,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_initial_translation_delay_ms")]
    pub initial_translation_delay_ms: u64,
    /// Upper bound on matching candidates scanned for a rendered one
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    #[serde(default = "default_liveness_interval_ms")]
    pub liveness_interval_ms: u64,
    /// Panel part name -> CSS declarations replacing the built-in style
    pub panel_style: BTreeMap<String, String>,
    /// Element whose label names the target language
    pub auto_target_language_selector: Option<String>,
    pub auto_clone: Option<AutoClone>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            input_selector: String::new(),
            persistence_id: None,
            debounce_ms: default_debounce_ms(),
            mount_depth: default_mount_depth(),
            content_kind: ContentKind::default(),
            default_from_language: default_from_language(),
            default_to_language: default_to_language(),
            auto_language_label: default_auto_language_label(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            initial_translation_delay_ms: default_initial_translation_delay_ms(),
            candidate_limit: default_candidate_limit(),
            liveness_interval_ms: default_liveness_interval_ms(),
            panel_style: BTreeMap::new(),
            auto_target_language_selector: None,
            auto_clone: None,
        }
    }
}

impl FieldConfig {
    pub fn new(input_selector: impl Into<String>) -> Self {
        Self {
            input_selector: input_selector.into(),
            ..Self::default()
        }
    }

    pub fn with_persistence_id(mut self, id: impl Into<String>) -> Self {
        self.persistence_id = Some(id.into());
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_selector.trim().is_empty() {
            return Err(ConfigError::MissingInputSelector);
        }
        Ok(())
    }

    /// Name used in logs
    pub fn name(&self) -> &str {
        self.persistence_id
            .as_deref()
            .unwrap_or(self.input_selector.as_str())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn initial_translation_delay(&self) -> Duration {
        Duration::from_millis(self.initial_translation_delay_ms)
    }

    pub fn liveness_interval(&self) -> Duration {
        Duration::from_millis(self.liveness_interval_ms.max(1))
    }
}
