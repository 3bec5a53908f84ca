pub mod alert;
pub mod content;
pub mod events;
pub mod field;
pub mod host;
pub mod page;
pub mod panel;
pub mod store;
pub mod watcher;

pub use events::{FieldEvent, FieldSink, WatcherEvent};
pub use field::{FieldContext, FieldError, FieldOutcome, FieldState, FieldTranslator};
pub use host::{ElementId, HostError, ListenerId, ObserverId, PageHost, PanelId, PanelUpdate};
pub use oyt_config::ContentKind;
pub use page::PageKind;
pub use panel::PanelSpec;
pub use store::{MemoryStore, PreferenceStore, StoreError};
pub use watcher::PageWatcher;
