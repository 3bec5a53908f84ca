use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use oyt_translator::{
    ProviderMetadata, TranslateError, Translation, TranslationRequest, Translator,
};

use super::ShoutTranslator;
use crate::oneshot::{Outcome, describe, translate_once};

#[derive(Default)]
struct CountingTranslator {
    calls: AtomicUsize,
}

#[async_trait]
impl Translator for CountingTranslator {
    async fn translate(&self, request: TranslationRequest) -> Result<Translation, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ShoutTranslator.translate(request).await
    }

    fn metadata(&self) -> ProviderMetadata {
        ShoutTranslator.metadata()
    }
}

#[tokio::test]
async fn blank_text_skips_the_provider() {
    let translator = CountingTranslator::default();

    let outcome = translate_once(&translator, TranslationRequest::new(" \n ", "auto", "tr"))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Blank);
    assert_eq!(outcome.text(), None);
    assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn same_language_returns_text_unchanged() {
    let translator = CountingTranslator::default();

    let outcome = translate_once(&translator, TranslationRequest::new("Merhaba", "tr", "tr"))
        .await
        .unwrap();

    assert_eq!(outcome.text(), Some("Merhaba"));
    assert_eq!(translator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn auto_source_always_reaches_the_provider() {
    let translator = CountingTranslator::default();

    let outcome = translate_once(&translator, TranslationRequest::new("hello", "auto", "auto"))
        .await
        .unwrap();

    assert_eq!(outcome.text(), Some("HELLO"));
    assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn translation_is_described_with_its_origin() {
    let translator = CountingTranslator::default();

    let Outcome::Translated(detected) =
        translate_once(&translator, TranslationRequest::new("hello", "auto", "tr"))
            .await
            .unwrap()
    else {
        panic!("expected a translation");
    };
    assert_eq!(describe(&detected), "Detected: English ➤ Turkish via shout");

    let Outcome::Translated(explicit) =
        translate_once(&translator, TranslationRequest::new("hallo", "de", "xx"))
            .await
            .unwrap()
    else {
        panic!("expected a translation");
    };
    assert_eq!(describe(&explicit), "German ➤ xx via shout");
}
