//! Lifecycle tests driving real field translators against the virtual page

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kanal::AsyncSender;
use oyt_core::panel::LOADING_INDICATOR;
use oyt_core::{FieldContext, MemoryStore, PageHost, PreferenceStore, WatcherEvent};
use oyt_translator::{
    AUTO, ProviderMetadata, TranslateError, Translation, TranslationRequest, Translator,
};

use crate::page::VirtualPage;

mod watcher_tests;

/// Records every request; answers from a script, then echoes
#[derive(Default)]
pub struct FakeTranslator {
    requests: Mutex<Vec<TranslationRequest>>,
    script: Mutex<VecDeque<Result<Translation, TranslateError>>>,
}

impl FakeTranslator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_ok(&self, text: &str, detected: Option<&str>) {
        self.script.lock().unwrap().push_back(Ok(Translation {
            text: text.to_string(),
            from: String::new(),
            to: String::new(),
            detected_from: detected.map(str::to_string),
            provider: "fake".to_string(),
        }));
    }

    pub fn push_err(&self, error: TranslateError) {
        self.script.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<TranslationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, request: TranslationRequest) -> Result<Translation, TranslateError> {
        self.requests.lock().unwrap().push(request.clone());

        let scripted = self.script.lock().unwrap().pop_front();
        match scripted {
            Some(Ok(mut translation)) => {
                translation.from = request.from;
                translation.to = request.to;
                Ok(translation)
            }
            Some(Err(e)) => Err(e),
            None => Ok(Translation {
                text: format!("[{}] {}", request.to, request.text),
                detected_from: (request.from == AUTO).then(|| "en".to_string()),
                from: request.from,
                to: request.to,
                provider: "fake".to_string(),
            }),
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".to_string(),
            requires_api_key: false,
            free_tier_available: true,
        }
    }
}

pub fn context(
    page: &Arc<VirtualPage>,
    translator: &Arc<FakeTranslator>,
    store: &Arc<MemoryStore>,
    watcher: Option<AsyncSender<WatcherEvent>>,
) -> FieldContext {
    let host: Arc<dyn PageHost> = page.clone();
    let translator: Arc<dyn Translator> = translator.clone();
    let store: Arc<dyn PreferenceStore> = store.clone();

    FieldContext {
        page_key: host.current_url(),
        host,
        translator,
        store,
        watcher,
    }
}

pub fn strip_loading(output: &str) -> &str {
    output.strip_suffix(LOADING_INDICATOR).unwrap_or(output)
}
