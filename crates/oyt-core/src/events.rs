use kanal::{AsyncReceiver, AsyncSender};

/// Things the page reports to a field translator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// The tracked input changed, by typing or by a programmatic write
    InputChanged,
    /// Something in the page structure changed
    PageMutated,
    FromLanguageSelected(String),
    ToLanguageSelected(String),
    SwapRequested,
}

/// Sending half handed to the page host.
///
/// Host callbacks are synchronous, so events are pushed without waiting.
#[derive(Clone)]
pub struct FieldSink {
    tx: AsyncSender<FieldEvent>,
}

impl FieldSink {
    pub fn channel() -> (Self, AsyncReceiver<FieldEvent>) {
        let (tx, rx) = kanal::unbounded_async();
        (Self { tx }, rx)
    }

    pub fn emit(&self, event: FieldEvent) {
        if let Err(e) = self.tx.try_send(event) {
            tracing::trace!("field event dropped: {e}");
        }
    }
}

/// Notifications from fields to the page watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatcherEvent {
    /// A field's input left the page; the next tick must bind again
    FieldRemoved { field: String },
}
