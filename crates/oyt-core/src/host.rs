use oyt_config::ContentKind;

use crate::events::FieldSink;
use crate::panel::PanelSpec;

/// Opaque handle to an element owned by the host page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PanelId(pub u64);

/// Changes pushed to a mounted output panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelUpdate {
    /// Replace the output area with rendered markup
    SetOutput(String),
    /// Relabel the auto-detect option of the source selector
    SetAutoOptionLabel(String),
    /// Move both selectors to the given codes
    SelectLanguages { from: String, to: String },
}

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("Unknown element: {0:?}")]
    UnknownElement(ElementId),

    #[error("Element {0:?} is not attached to the page")]
    Detached(ElementId),

    #[error("Unknown panel: {0:?}")]
    UnknownPanel(PanelId),
}

/// Everything the translator needs from the page it augments.
///
/// Implementations adapt a concrete page (a browser document, or the
/// in-memory page used by the CLI and tests). Events flow back into a
/// field through the [`FieldSink`] handed over when listening.
pub trait PageHost: Send + Sync {
    /// Address of the page currently shown
    fn current_url(&self) -> String;

    /// False inside an embedded frame
    fn is_top_level(&self) -> bool;

    /// Elements matching `selector`, in document order, at most `limit`
    fn query_all(&self, selector: &str, limit: usize) -> Vec<ElementId>;

    fn is_attached(&self, element: ElementId) -> bool;

    /// Whether the element has a layout box, i.e. is actually rendered
    fn is_rendered(&self, element: ElementId) -> bool;

    fn parent(&self, element: ElementId) -> Option<ElementId>;

    fn read_content(&self, element: ElementId, kind: ContentKind) -> Result<String, HostError>;

    fn write_content(
        &self,
        element: ElementId,
        kind: ContentKind,
        value: &str,
    ) -> Result<(), HostError>;

    /// Fire the page's own input event on `element` after a programmatic write
    fn notify_input(&self, element: ElementId);

    fn listen_input(&self, element: ElementId, sink: FieldSink) -> ListenerId;

    fn unlisten_input(&self, listener: ListenerId);

    /// Report structural page changes to `sink` as [`crate::FieldEvent::PageMutated`]
    fn observe_mutations(&self, sink: FieldSink) -> ObserverId;

    fn disconnect(&self, observer: ObserverId);

    /// Render `spec` as the last child of `anchor`; panel controls report to `sink`
    fn mount_panel(
        &self,
        anchor: ElementId,
        spec: &PanelSpec,
        sink: FieldSink,
    ) -> Result<PanelId, HostError>;

    fn update_panel(&self, panel: PanelId, update: PanelUpdate);

    fn remove_panel(&self, panel: PanelId);

    /// Append one line to the error log overlay, creating and showing it as needed
    fn show_error(&self, entry: &str);

    /// First rendered element among the first `limit` matches
    fn find_rendered(&self, selector: &str, limit: usize) -> Option<ElementId> {
        self.query_all(selector, limit)
            .into_iter()
            .find(|&el| self.is_rendered(el))
    }

    /// Walk `depth` parents up from `element`
    fn ancestor(&self, element: ElementId, depth: usize) -> Option<ElementId> {
        (0..depth).try_fold(element, |el, _| self.parent(el))
    }

    /// Attached and rendered
    fn is_live(&self, element: ElementId) -> bool {
        self.is_attached(element) && self.is_rendered(element)
    }
}
