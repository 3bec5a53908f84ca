use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use oyt_config::{ConfigError, FieldConfig, WatcherConfig};
use oyt_translator::Translator;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::events::WatcherEvent;
use crate::field::{FieldContext, FieldOutcome, FieldTranslator};
use crate::host::PageHost;
use crate::page::PageKind;
use crate::store::PreferenceStore;

/// Binds field translators whenever the single-page app lands on a
/// supported page.
///
/// Navigation never reloads the document, so the URL is polled. Each
/// distinct URL is evaluated once; a field reporting that its input
/// vanished clears the remembered URL so the next tick binds again.
pub struct PageWatcher {
    host: Arc<dyn PageHost>,
    translator: Arc<dyn Translator>,
    store: Arc<dyn PreferenceStore>,
    config: WatcherConfig,
    current_page: Option<String>,
    events_tx: AsyncSender<WatcherEvent>,
    events_rx: AsyncReceiver<WatcherEvent>,
    /// Cancels the fields bound for the current page
    generation: Option<CancellationToken>,
    fields: JoinSet<FieldOutcome>,
}

impl PageWatcher {
    pub fn new(
        host: Arc<dyn PageHost>,
        translator: Arc<dyn Translator>,
        store: Arc<dyn PreferenceStore>,
        config: WatcherConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let (events_tx, events_rx) = kanal::unbounded_async();

        Ok(Self {
            host,
            translator,
            store,
            config,
            current_page: None,
            events_tx,
            events_rx,
            generation: None,
            fields: JoinSet::new(),
        })
    }

    pub fn current_page(&self) -> Option<&str> {
        self.current_page.as_deref()
    }

    /// Forget the last seen URL so the next tick evaluates the page again
    pub fn reset(&mut self) {
        self.current_page = None;
    }

    /// Compare the URL with the last one seen and bind fields if it changed
    /// to a supported page. Returns the page kind bound on this tick.
    pub fn tick(&mut self) -> Option<PageKind> {
        while let Some(joined) = self.fields.try_join_next() {
            if let Err(e) = joined {
                tracing::error!("field task panicked: {e}");
            }
        }

        let url = self.host.current_url();
        if self.current_page.as_deref() == Some(url.as_str()) {
            return None;
        }

        let kind = PageKind::classify(&url);
        if let Some(kind) = kind {
            tracing::info!(?kind, %url, "supported page, binding translators");
            self.bind(kind, &url);
        } else {
            tracing::debug!(%url, "page not supported");
        }

        // Recorded even for unsupported pages so they are not re-evaluated every tick
        self.current_page = Some(url);
        kind
    }

    fn handle(&mut self, event: WatcherEvent) {
        match event {
            WatcherEvent::FieldRemoved { field } => {
                tracing::info!(field, "field input left the page, re-arming");
                self.reset();
            }
        }
    }

    fn fields_for(&self, kind: PageKind) -> &[FieldConfig] {
        match kind {
            PageKind::VideoEdit => &self.config.edit_fields,
            PageKind::VideoTranslations => &self.config.translations_fields,
        }
    }

    fn bind(&mut self, kind: PageKind, url: &str) {
        if let Some(previous) = self.generation.take() {
            previous.cancel();
        }
        let generation = CancellationToken::new();

        let ctx = FieldContext {
            host: Arc::clone(&self.host),
            translator: Arc::clone(&self.translator),
            store: Arc::clone(&self.store),
            page_key: url.to_string(),
            watcher: Some(self.events_tx.clone()),
        };

        for config in self.fields_for(kind).to_vec() {
            match FieldTranslator::new(config, ctx.clone()) {
                Ok(field) => {
                    self.fields.spawn(field.run(generation.child_token()));
                }
                Err(e) => tracing::error!("invalid field configuration: {e}"),
            }
        }

        self.generation = Some(generation);
    }

    /// Poll until `cancel` fires. Does nothing inside an embedded frame.
    pub async fn run(mut self, cancel: CancellationToken) {
        if !self.host.is_top_level() {
            tracing::info!("In an iframe. Skipping.");
            return;
        }

        let events = self.events_rx.clone();
        let mut interval = tokio::time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!("Translator initiated.");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {
                    self.tick();
                }
                Ok(event) = events.recv() => self.handle(event),
            }
        }

        self.shutdown().await;
    }

    async fn shutdown(&mut self) {
        if let Some(generation) = self.generation.take() {
            generation.cancel();
        }
        while let Some(joined) = self.fields.join_next().await {
            match joined {
                Ok(outcome) => tracing::debug!(?outcome, "field task finished"),
                Err(e) => tracing::error!("field task panicked: {e}"),
            }
        }
        tracing::info!("page watcher stopped");
    }
}
