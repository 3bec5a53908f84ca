//! Studio pages laid out the way the field presets expect them.

use oyt_config::presets::{
    DESCRIPTION_SELECTOR, ORIGINAL_DESCRIPTION_SELECTOR, ORIGINAL_TITLE_SELECTOR,
    TARGET_LANGUAGE_LABEL_SELECTOR, TITLE_SELECTOR, TRANSLATED_DESCRIPTION_SELECTOR,
    TRANSLATED_TITLE_SELECTOR,
};
use oyt_core::ElementId;

use crate::page::VirtualPage;

pub fn edit_url(video_id: &str) -> String {
    format!("https://studio.youtube.com/video/{video_id}/edit")
}

pub fn translations_url(video_id: &str) -> String {
    format!("https://studio.youtube.com/video/{video_id}/translations")
}

/// Video details editor with title and description textboxes
#[derive(Debug, Clone, Copy)]
pub struct EditPage {
    /// Container holding both fields; hiding it is what a soft navigation does
    pub editor: ElementId,
    pub title: ElementId,
    pub title_anchor: ElementId,
    pub description: ElementId,
    pub description_anchor: ElementId,
}

impl EditPage {
    /// Build the editor into `page` and point the page at the edit URL
    pub fn build(page: &VirtualPage, video_id: &str) -> Self {
        page.navigate(edit_url(video_id));
        let editor = page.add_element(page.body(), &["ytcp-video-metadata-editor"]);

        let title_anchor = page.add_element(editor, &["#title-wrapper"]);
        let title_parent = page.add_containers(title_anchor, 3);
        let title = page.add_element(title_parent, &[TITLE_SELECTOR]);

        let description_anchor = page.add_element(editor, &["#description-wrapper"]);
        let description_parent = page.add_containers(description_anchor, 3);
        let description = page.add_element(description_parent, &[DESCRIPTION_SELECTOR]);

        Self {
            editor,
            title,
            title_anchor,
            description,
            description_anchor,
        }
    }
}

/// Translation editor dialog: original fields on the left, translated
/// fields on the right, and a label naming the target language
#[derive(Debug, Clone, Copy)]
pub struct TranslationsPage {
    pub dialog: ElementId,
    pub target_label: ElementId,
    pub original_title: ElementId,
    pub original_description: ElementId,
    pub title: ElementId,
    pub title_anchor: ElementId,
    pub description: ElementId,
    pub description_anchor: ElementId,
}

impl TranslationsPage {
    pub fn build(page: &VirtualPage, video_id: &str, target_language: &str) -> Self {
        page.navigate(translations_url(video_id));
        let dialog = page.add_element(page.body(), &["ytgn-video-translation-dialog"]);

        let target_label = page.add_element(dialog, &[TARGET_LANGUAGE_LABEL_SELECTOR]);
        page.set_text(target_label, target_language);

        let original_title = page.add_element(dialog, &[ORIGINAL_TITLE_SELECTOR]);
        let original_description = page.add_element(dialog, &[ORIGINAL_DESCRIPTION_SELECTOR]);

        let title_anchor = page.add_element(dialog, &["#translated-title"]);
        let title_parent = page.add_containers(title_anchor, 1);
        let title = page.add_element(title_parent, &[TRANSLATED_TITLE_SELECTOR]);

        let description_anchor = page.add_element(dialog, &["#translated-description"]);
        let description_parent = page.add_containers(description_anchor, 1);
        let description = page.add_element(description_parent, &[TRANSLATED_DESCRIPTION_SELECTOR]);

        Self {
            dialog,
            target_label,
            original_title,
            original_description,
            title,
            title_anchor,
            description,
            description_anchor,
        }
    }
}
