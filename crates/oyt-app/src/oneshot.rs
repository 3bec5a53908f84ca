//! The `translate` command: one request outside any page.

use oyt_translator::{
    AUTO, TranslateError, Translation, TranslationRequest, Translator, language_name,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing but whitespace to translate
    Blank,
    /// Source and target are the same language, text returned as is
    Unchanged(String),
    Translated(Translation),
}

impl Outcome {
    /// Text to print, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Outcome::Blank => None,
            Outcome::Unchanged(text) => Some(text),
            Outcome::Translated(translation) => Some(&translation.text),
        }
    }
}

/// Translate `request` unless the field would skip it: blank text and
/// same-language requests never reach the provider.
pub async fn translate_once(
    translator: &dyn Translator,
    request: TranslationRequest,
) -> Result<Outcome, TranslateError> {
    if request.text.trim().is_empty() {
        return Ok(Outcome::Blank);
    }
    if request.from != AUTO && request.from == request.to {
        return Ok(Outcome::Unchanged(request.text));
    }
    translator.translate(request).await.map(Outcome::Translated)
}

/// One-line summary of where a translation came from
pub fn describe(translation: &Translation) -> String {
    let source = match &translation.detected_from {
        Some(code) => format!("Detected: {}", language_name(code).unwrap_or(code)),
        None => language_name(&translation.from)
            .unwrap_or(&translation.from)
            .to_string(),
    };
    let target = language_name(&translation.to).unwrap_or(&translation.to);
    format!("{source} ➤ {target} via {}", translation.provider)
}
