//! Output panel model.
//!
//! The field describes the panel it wants; the host decides how to render
//! it. Styles lean on the studio's own CSS variables so the panel follows
//! the light/dark theme.

use std::collections::BTreeMap;

use oyt_translator::{AUTO, Language};

use crate::content::text_to_markup;

pub const OUTPUT_LABEL: &str = "Translation";
pub const SELECTOR_LABEL: &str = "Select Translator Language";
pub const INITIAL_OUTPUT: &str = "Initiation...";
pub const WAITING_FOR_CONTENT: &str = "🤷‍♂️ Waiting for content to translate...";
pub const NO_TRANSLATION: &str = "🤷‍♂️ No translation found.";
pub const LOADING_INDICATOR: &str = " ⏳";
pub const ARROW: &str = "➤";
pub const SWAP: &str = "⇄";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSelect {
    pub options: Vec<SelectOption>,
    pub selected: String,
}

impl LanguageSelect {
    /// Menu over `languages`, optionally led by the auto-detect option
    pub fn new(languages: &[Language], selected: &str, auto_label: Option<&str>) -> Self {
        let auto = auto_label.map(|label| SelectOption {
            value: AUTO.to_string(),
            label: label.to_string(),
        });

        let options = auto
            .into_iter()
            .chain(languages.iter().map(|l| SelectOption {
                value: l.code.to_string(),
                label: l.name.to_string(),
            }))
            .collect();

        Self {
            options,
            selected: selected.to_string(),
        }
    }

    pub fn label_of(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|o| o.value == value)
            .map(|o| o.label.as_str())
    }
}

/// CSS declarations for each panel part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelStyles {
    pub output_label: String,
    pub output: String,
    pub selector_label: String,
    pub selectors_row: String,
    pub select: String,
    pub arrow: String,
    pub swap: String,
}

fn declarations(items: &[&str]) -> String {
    items.join("; ")
}

impl Default for PanelStyles {
    fn default() -> Self {
        Self {
            output_label: declarations(&[
                r#"font-family: "Roboto","Noto",sans-serif"#,
                "font-weight: 400",
                "font-size: 12px",
                "color: var(--ytcp-text-secondary)",
                "padding-bottom: 5px",
                "display: block",
            ]),
            output: declarations(&[
                r#"font-family: "Roboto","Noto",sans-serif"#,
                "font-weight: 400",
                "font-size: 14px",
                "color: var(--ytcp-text-primary)",
                "padding-bottom: 5px",
            ]),
            selector_label: declarations(&[
                r#"font-family: "Roboto","Noto",sans-serif"#,
                "font-weight: 400",
                "font-size: 12px",
                "color: var(--ytcp-text-secondary)",
                "padding-top: 5px",
                "padding-bottom: 10px",
                "display: block",
            ]),
            selectors_row: declarations(&["display: flex", "justify-content: center"]),
            select: declarations(&[
                "background-color: var(--ytcp-brand-background-solid)",
                "color: var(--ytcp-text-primary)",
                "border-radius: 5px",
                "margin-top: -3px",
            ]),
            arrow: declarations(&["font-size: 16px", "margin: 0px 10px 6px 10px"]),
            swap: declarations(&[
                "background: none",
                "border: none",
                "cursor: pointer",
                "color: var(--ytcp-text-primary)",
                "font-size: 16px",
                "margin: -6px 10px 0px 0px",
            ]),
        }
    }
}

impl PanelStyles {
    /// Replace parts named in `overrides`; unknown names are logged and skipped
    pub fn with_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (part, css) in overrides {
            let slot = match part.as_str() {
                "output_label" => &mut self.output_label,
                "output" => &mut self.output,
                "selector_label" => &mut self.selector_label,
                "selectors_row" => &mut self.selectors_row,
                "select" => &mut self.select,
                "arrow" => &mut self.arrow,
                "swap" => &mut self.swap,
                other => {
                    tracing::warn!(part = other, "unknown panel style part");
                    continue;
                }
            };
            *slot = css.clone();
        }
        self
    }
}

/// Everything needed to render one field's output panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSpec {
    pub output_label: String,
    pub initial_output: String,
    pub selector_label: String,
    pub from_select: LanguageSelect,
    pub arrow: String,
    pub swap: String,
    pub to_select: LanguageSelect,
    pub styles: PanelStyles,
}

impl PanelSpec {
    pub fn build(
        languages: &[Language],
        from: &str,
        to: &str,
        auto_label: &str,
        style_overrides: &BTreeMap<String, String>,
    ) -> Self {
        Self {
            output_label: OUTPUT_LABEL.to_string(),
            initial_output: INITIAL_OUTPUT.to_string(),
            selector_label: SELECTOR_LABEL.to_string(),
            from_select: LanguageSelect::new(languages, from, Some(auto_label)),
            arrow: ARROW.to_string(),
            swap: SWAP.to_string(),
            to_select: LanguageSelect::new(languages, to, None),
            styles: PanelStyles::default().with_overrides(style_overrides),
        }
    }
}

/// Render translated text for the output area, which shows raw markup
pub fn format_output(text: &str) -> String {
    text_to_markup(text)
}
