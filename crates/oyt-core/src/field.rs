//! One translated input: locate it, mount an output panel next to it,
//! translate what is typed, and tear everything down once the input
//! leaves the page.

use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use oyt_config::{AutoClone, ConfigError, FieldConfig};
use oyt_translator::{
    AUTO, LanguageCode, TranslateError, Translation, TranslationRequest, Translator, code_for_name,
    language_name,
};
use tokio::time::{Instant, MissedTickBehavior, sleep, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::alert::report_error;
use crate::content::{from_text, to_text};
use crate::events::{FieldEvent, FieldSink, WatcherEvent};
use crate::host::{ElementId, HostError, ListenerId, ObserverId, PageHost, PanelId, PanelUpdate};
use crate::panel::{
    INITIAL_OUTPUT, LOADING_INDICATOR, NO_TRANSLATION, PanelSpec, WAITING_FOR_CONTENT,
    format_output,
};
use crate::store::{FROM_LANGUAGE_KEY, PreferenceStore, StoreError, TO_LANGUAGE_KEY, preference_key};

/// Shared dependencies of every field on a page
#[derive(Clone)]
pub struct FieldContext {
    pub host: Arc<dyn PageHost>,
    pub translator: Arc<dyn Translator>,
    pub store: Arc<dyn PreferenceStore>,
    /// URL the field was created for; initialization stops once the page moves on
    pub page_key: String,
    /// Told when the field's input disappears
    pub watcher: Option<AsyncSender<WatcherEvent>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    Locating,
    Ready,
    Active,
    TornDown,
}

/// Why a field stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    /// The input was detached or hidden; the watcher has been told
    Removed,
    Cancelled,
    /// The page changed before the input was found
    Abandoned,
    /// Every allowed attempt to initialize failed
    GaveUp,
}

#[derive(Debug, thiserror::Error)]
pub enum FieldError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Input element not found. Selector: {0}")]
    InputNotFound(String),

    #[error("Source element not found. Selector: {0}")]
    SourceNotFound(String),

    #[error("No element {depth} levels above the input to mount the panel on")]
    MountPointMissing { depth: usize },

    #[error(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

struct Completion {
    requested_from: LanguageCode,
    result: Result<Translation, TranslateError>,
}

pub struct FieldTranslator {
    config: FieldConfig,
    ctx: FieldContext,
    state: FieldState,
    attempts: u32,

    input: Option<ElementId>,
    panel: Option<PanelId>,
    listener: Option<ListenerId>,
    observer: Option<ObserverId>,

    from_language: LanguageCode,
    to_language: LanguageCode,
    /// Last valid output, rendered
    output: String,
    /// Plain text behind `output`; this is what a swap moves into the input
    output_text: String,
    loading_shown: bool,
    /// Deadline of the one cued translation
    cued: Option<Instant>,

    sink: FieldSink,
    events: AsyncReceiver<FieldEvent>,
    completions_tx: AsyncSender<Completion>,
    completions: AsyncReceiver<Completion>,
}

impl FieldTranslator {
    pub fn new(config: FieldConfig, ctx: FieldContext) -> Result<Self, FieldError> {
        config.validate()?;

        let (sink, events) = FieldSink::channel();
        let (completions_tx, completions) = kanal::unbounded_async();

        Ok(Self {
            from_language: config.default_from_language.clone(),
            to_language: config.default_to_language.clone(),
            config,
            ctx,
            state: FieldState::Locating,
            attempts: 0,
            input: None,
            panel: None,
            listener: None,
            observer: None,
            output: INITIAL_OUTPUT.to_string(),
            output_text: String::new(),
            loading_shown: false,
            cued: None,
            sink,
            events,
            completions_tx,
            completions,
        })
    }

    pub fn name(&self) -> &str {
        self.config.name()
    }

    pub fn state(&self) -> FieldState {
        self.state
    }

    /// Initialize, translate until the input disappears or `cancel` fires, then clean up
    pub async fn run(mut self, cancel: CancellationToken) -> FieldOutcome {
        if let Err(outcome) = self.initialize(&cancel).await {
            self.state = FieldState::TornDown;
            return outcome;
        }

        let outcome = self.active(&cancel).await;
        self.teardown(outcome);
        outcome
    }

    async fn initialize(&mut self, cancel: &CancellationToken) -> Result<(), FieldOutcome> {
        loop {
            if self.ctx.host.current_url() != self.ctx.page_key {
                tracing::debug!(field = self.name(), "page changed, initialization aborted");
                return Err(FieldOutcome::Abandoned);
            }

            self.attempts += 1;
            match self.try_initialize().await {
                Ok(()) => {
                    self.state = FieldState::Ready;
                    tracing::info!(
                        field = self.name(),
                        attempts = self.attempts,
                        from = %self.from_language,
                        to = %self.to_language,
                        "translator ready"
                    );
                    return Ok(());
                }
                Err(e) => {
                    if self
                        .config
                        .max_attempts
                        .is_some_and(|max| self.attempts >= max)
                    {
                        tracing::error!(
                            field = self.name(),
                            attempts = self.attempts,
                            "failed to initialize: {e}"
                        );
                        return Err(FieldOutcome::GaveUp);
                    }
                    tracing::debug!(field = self.name(), attempt = self.attempts, "not ready yet: {e}");
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(FieldOutcome::Cancelled),
                _ = sleep(self.config.retry_delay()) => {}
            }
        }
    }

    async fn try_initialize(&mut self) -> Result<(), FieldError> {
        let host = Arc::clone(&self.ctx.host);

        let input = host
            .find_rendered(&self.config.input_selector, self.config.candidate_limit)
            .ok_or_else(|| FieldError::InputNotFound(self.config.input_selector.clone()))?;

        self.from_language = self.config.default_from_language.clone();
        self.to_language = self.config.default_to_language.clone();
        self.restore_preferences().await?;

        if let Some(selector) = self.config.auto_target_language_selector.clone() {
            self.pick_target_language(&selector)?;
        }

        if let Some(auto_clone) = self.config.auto_clone.clone() {
            self.clone_original(input, &auto_clone)?;
        }

        let depth = self.config.mount_depth;
        let anchor = host
            .ancestor(input, depth)
            .ok_or(FieldError::MountPointMissing { depth })?;
        let spec = PanelSpec::build(
            self.ctx.translator.supported_languages(),
            &self.from_language,
            &self.to_language,
            &self.config.auto_language_label,
            &self.config.panel_style,
        );
        let panel = host.mount_panel(anchor, &spec, self.sink.clone())?;

        self.listener = Some(host.listen_input(input, self.sink.clone()));
        self.observer = Some(host.observe_mutations(self.sink.clone()));
        self.input = Some(input);
        self.panel = Some(panel);
        self.output = spec.initial_output;
        Ok(())
    }

    async fn restore_preferences(&mut self) -> Result<(), StoreError> {
        let Some(id) = self.config.persistence_id.clone() else {
            return Ok(());
        };

        let store = Arc::clone(&self.ctx.store);
        if let Some(from) = store
            .get(&preference_key(&id, FROM_LANGUAGE_KEY))
            .await?
            .filter(|v| !v.is_empty())
        {
            self.from_language = from;
        }
        if let Some(to) = store
            .get(&preference_key(&id, TO_LANGUAGE_KEY))
            .await?
            .filter(|v| !v.is_empty())
        {
            self.to_language = to;
        }
        Ok(())
    }

    fn pick_target_language(&mut self, selector: &str) -> Result<(), FieldError> {
        let host = Arc::clone(&self.ctx.host);
        let source = host
            .find_rendered(selector, self.config.candidate_limit)
            .ok_or_else(|| FieldError::SourceNotFound(selector.to_string()))?;
        let label = host.read_content(source, oyt_config::ContentKind::Text)?;

        match code_for_name(&label) {
            Some(code) => self.to_language = code.to_string(),
            None => tracing::warn!(
                field = self.name(),
                label = label.trim(),
                "unrecognised target language label"
            ),
        }
        Ok(())
    }

    fn clone_original(&self, input: ElementId, auto_clone: &AutoClone) -> Result<(), FieldError> {
        let host = &self.ctx.host;
        let kind = self.config.content_kind;

        let current = to_text(host.read_content(input, kind)?, kind);
        if !current.trim().is_empty() {
            return Ok(());
        }

        let source = host
            .find_rendered(&auto_clone.selector, self.config.candidate_limit)
            .ok_or_else(|| FieldError::SourceNotFound(auto_clone.selector.clone()))?;
        let original = to_text(
            host.read_content(source, auto_clone.content_kind)?,
            auto_clone.content_kind,
        );
        if original.is_empty() {
            return Ok(());
        }

        host.write_content(input, kind, &from_text(&original, kind))?;
        host.notify_input(input);
        tracing::debug!(field = self.name(), chars = original.len(), "cloned original content");
        Ok(())
    }

    async fn active(&mut self, cancel: &CancellationToken) -> FieldOutcome {
        self.state = FieldState::Active;
        self.cued = Some(Instant::now() + self.config.initial_translation_delay());

        let events = self.events.clone();
        let completions = self.completions.clone();
        let mut liveness = tokio::time::interval(self.config.liveness_interval());
        liveness.set_missed_tick_behavior(MissedTickBehavior::Delay);
        liveness.reset();

        loop {
            let cued = self.cued;
            tokio::select! {
                _ = cancel.cancelled() => return FieldOutcome::Cancelled,
                _ = sleep_until(cued.unwrap_or_else(Instant::now)), if cued.is_some() => {
                    self.cued = None;
                    if let Some(outcome) = self.translate() {
                        return outcome;
                    }
                }
                Ok(event) = events.recv() => {
                    if let Some(outcome) = self.handle_event(event).await {
                        return outcome;
                    }
                }
                Ok(completion) = completions.recv() => self.apply_completion(completion),
                _ = liveness.tick() => {
                    if !self.input_is_live() {
                        return FieldOutcome::Removed;
                    }
                }
            }
        }
    }

    async fn handle_event(&mut self, event: FieldEvent) -> Option<FieldOutcome> {
        match event {
            FieldEvent::InputChanged => self.cue_translation(),
            FieldEvent::PageMutated => {
                if !self.input_is_live() {
                    return Some(FieldOutcome::Removed);
                }
            }
            FieldEvent::FromLanguageSelected(code) => {
                self.from_language = code;
                self.persist(FROM_LANGUAGE_KEY, &self.from_language).await;
                self.cued = None;
                return self.translate();
            }
            FieldEvent::ToLanguageSelected(code) => {
                self.to_language = code;
                self.persist(TO_LANGUAGE_KEY, &self.to_language).await;
                self.cued = None;
                return self.translate();
            }
            FieldEvent::SwapRequested => self.swap().await,
        }
        None
    }

    /// Replace any cued translation with a fresh one after the debounce delay
    fn cue_translation(&mut self) {
        if self
            .cued
            .replace(Instant::now() + self.config.debounce())
            .is_some()
        {
            tracing::trace!(field = self.name(), "cued translation replaced");
        }

        if !self.loading_shown {
            self.show(format!("{}{LOADING_INDICATOR}", self.output));
            self.loading_shown = true;
        }
    }

    /// Start a translation of the current input.
    ///
    /// In-flight requests are never cancelled; whichever response arrives
    /// last owns the output.
    fn translate(&mut self) -> Option<FieldOutcome> {
        if !self.input_is_live() {
            return Some(FieldOutcome::Removed);
        }
        let input = self.input?;

        let kind = self.config.content_kind;
        let text = match self.ctx.host.read_content(input, kind) {
            Ok(value) => to_text(value, kind),
            Err(e) => {
                tracing::warn!(field = self.name(), "cannot read input: {e}");
                return None;
            }
        };

        if text.trim().is_empty() {
            self.settle(WAITING_FOR_CONTENT.to_string(), String::new());
            return None;
        }

        if self.from_language != AUTO && self.from_language == self.to_language {
            self.apply_text(text);
            return None;
        }

        let request = TranslationRequest::new(text, &self.from_language, &self.to_language);
        tracing::debug!(
            field = self.name(),
            from = %request.from,
            to = %request.to,
            chars = request.text.len(),
            "requesting translation"
        );

        let translator = Arc::clone(&self.ctx.translator);
        let done = self.completions_tx.clone();
        tokio::spawn(async move {
            let requested_from = request.from.clone();
            let result = translator.translate(request).await;
            let _ = done
                .send(Completion {
                    requested_from,
                    result,
                })
                .await;
        });
        None
    }

    fn apply_completion(&mut self, completion: Completion) {
        match completion.result {
            Ok(translation) => {
                if completion.requested_from == AUTO {
                    self.apply_detection(translation.detected_from.as_deref());
                }
                self.apply_text(translation.text);
            }
            Err(e) => {
                report_error(self.ctx.host.as_ref(), self.name(), &e);
                self.loading_shown = false;
                self.show(self.output.clone());
            }
        }
    }

    fn apply_detection(&mut self, detected: Option<&str>) {
        let label = match detected {
            Some(code) => {
                if self.from_language == AUTO {
                    self.from_language = code.to_string();
                }
                format!("Detected: {}", language_name(code).unwrap_or(code))
            }
            None => self.config.auto_language_label.clone(),
        };
        self.update_panel(PanelUpdate::SetAutoOptionLabel(label));
    }

    fn apply_text(&mut self, text: String) {
        let rendered = if text.is_empty() {
            NO_TRANSLATION.to_string()
        } else {
            format_output(&text)
        };
        self.settle(rendered, text);
    }

    /// New valid output; ends the loading indicator of this cycle
    fn settle(&mut self, rendered: String, text: String) {
        self.output = rendered;
        self.output_text = text;
        self.loading_shown = false;
        self.show(self.output.clone());
    }

    /// Exchange languages and contents of input and output.
    ///
    /// Writing the input fires the page's input event, which cues the
    /// translation like typing would.
    async fn swap(&mut self) {
        if self.from_language == AUTO {
            tracing::info!(field = self.name(), "swap ignored until the source language is known");
            return;
        }
        let Some(input) = self.input else {
            return;
        };

        let host = Arc::clone(&self.ctx.host);
        let kind = self.config.content_kind;
        let current = match host.read_content(input, kind) {
            Ok(value) => to_text(value, kind),
            Err(e) => {
                tracing::warn!(field = self.name(), "cannot read input for swap: {e}");
                return;
            }
        };
        let translated = std::mem::take(&mut self.output_text);
        if let Err(e) = host.write_content(input, kind, &from_text(&translated, kind)) {
            tracing::warn!(field = self.name(), "cannot write input for swap: {e}");
            self.output_text = translated;
            return;
        }

        std::mem::swap(&mut self.from_language, &mut self.to_language);
        self.update_panel(PanelUpdate::SelectLanguages {
            from: self.from_language.clone(),
            to: self.to_language.clone(),
        });

        let rendered = if current.trim().is_empty() {
            WAITING_FOR_CONTENT.to_string()
        } else {
            format_output(&current)
        };
        self.settle(rendered, current);

        host.notify_input(input);
        self.persist(FROM_LANGUAGE_KEY, &self.from_language).await;
        self.persist(TO_LANGUAGE_KEY, &self.to_language).await;
    }

    async fn persist(&self, key: &str, value: &str) {
        let Some(id) = &self.config.persistence_id else {
            return;
        };
        if let Err(e) = self.ctx.store.set(&preference_key(id, key), value).await {
            tracing::warn!(field = self.name(), key, "failed to persist preference: {e}");
        }
    }

    fn input_is_live(&self) -> bool {
        self.input.is_some_and(|el| self.ctx.host.is_live(el))
    }

    fn show(&self, html: String) {
        self.update_panel(PanelUpdate::SetOutput(html));
    }

    fn update_panel(&self, update: PanelUpdate) {
        if let Some(panel) = self.panel {
            self.ctx.host.update_panel(panel, update);
        }
    }

    fn teardown(&mut self, outcome: FieldOutcome) {
        let host = Arc::clone(&self.ctx.host);

        if let Some(listener) = self.listener.take() {
            host.unlisten_input(listener);
        }
        self.input = None;
        if let Some(panel) = self.panel.take() {
            host.remove_panel(panel);
        }
        self.cued = None;
        self.state = FieldState::TornDown;

        if outcome == FieldOutcome::Removed
            && let Some(watcher) = &self.ctx.watcher
            && let Err(e) = watcher.try_send(WatcherEvent::FieldRemoved {
                field: self.name().to_string(),
            })
        {
            tracing::warn!(field = self.name(), "could not notify page watcher: {e}");
        }

        if let Some(observer) = self.observer.take() {
            host.disconnect(observer);
        }
        tracing::info!(field = self.name(), ?outcome, "translator torn down");
    }
}
