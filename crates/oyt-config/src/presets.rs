//! Field sets bound on each supported studio page.

use crate::{AutoClone, ContentKind, FieldConfig};

pub const TITLE_SELECTOR: &str = "div .style-scope .ytcp-social-suggestions-textbox #textbox";
pub const DESCRIPTION_SELECTOR: &str =
    "#description-textarea .style-scope .ytcp-social-suggestions-textbox #textbox";

pub const TRANSLATED_TITLE_SELECTOR: &str = "#translated-title textarea";
pub const TRANSLATED_DESCRIPTION_SELECTOR: &str = "#translated-description textarea";
pub const ORIGINAL_TITLE_SELECTOR: &str = "#original-title textarea";
pub const ORIGINAL_DESCRIPTION_SELECTOR: &str = "#original-description textarea";
pub const TARGET_LANGUAGE_LABEL_SELECTOR: &str = "#metadata-editor-target-language";

/// Title and description of the video details editor
pub fn edit_page_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new(TITLE_SELECTOR).with_persistence_id("title"),
        FieldConfig::new(DESCRIPTION_SELECTOR).with_persistence_id("description"),
    ]
}

/// Translated title and description of the subtitles/translations editor.
///
/// That editor renders late, so these fields never give up locating
/// their input.
pub fn translations_page_fields() -> Vec<FieldConfig> {
    let field = |input: &str, original: &str, id: &str| FieldConfig {
        content_kind: ContentKind::Text,
        max_attempts: None,
        mount_depth: 2,
        default_from_language: "auto".to_string(),
        auto_target_language_selector: Some(TARGET_LANGUAGE_LABEL_SELECTOR.to_string()),
        auto_clone: Some(AutoClone {
            selector: original.to_string(),
            content_kind: ContentKind::Text,
        }),
        ..FieldConfig::new(input).with_persistence_id(id)
    };

    vec![
        field(
            TRANSLATED_TITLE_SELECTOR,
            ORIGINAL_TITLE_SELECTOR,
            "translation-title",
        ),
        field(
            TRANSLATED_DESCRIPTION_SELECTOR,
            ORIGINAL_DESCRIPTION_SELECTOR,
            "translation-description",
        ),
    ]
}
