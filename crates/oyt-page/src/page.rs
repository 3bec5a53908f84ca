//! In-memory stand-in for the studio page.
//!
//! Elements form a tree under a body root. Selectors are matched by name:
//! an element answers to every selector string it was created with.
//! Content is stored as plain text and converted when read or written as
//! markup.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use oyt_config::ContentKind;
use oyt_core::alert::{ALERT_DESCRIPTION, ALERT_TITLE};
use oyt_core::content::{markup_to_text, text_to_markup};
use oyt_core::{
    ElementId, FieldEvent, FieldSink, HostError, ListenerId, ObserverId, PageHost, PanelId,
    PanelSpec, PanelUpdate,
};
use oyt_translator::AUTO;

const BODY: ElementId = ElementId(0);

struct Node {
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    selectors: Vec<String>,
    text: String,
    hidden: bool,
}

impl Node {
    fn new(parent: Option<ElementId>, selectors: Vec<String>) -> Self {
        Self {
            parent,
            children: Vec::new(),
            selectors,
            text: String::new(),
            hidden: false,
        }
    }
}

/// A mounted output panel as the page currently shows it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelView {
    pub id: PanelId,
    pub anchor: ElementId,
    pub element: ElementId,
    pub spec: PanelSpec,
    pub output: String,
    pub auto_label: String,
    pub from: String,
    pub to: String,
}

/// The error overlay: created on first error, then only appended to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorLogView {
    pub title: String,
    pub description: String,
    pub entries: Vec<String>,
    pub visible: bool,
}

impl Default for ErrorLogView {
    fn default() -> Self {
        Self {
            title: ALERT_TITLE.to_string(),
            description: ALERT_DESCRIPTION.to_string(),
            entries: Vec::new(),
            visible: false,
        }
    }
}

struct MountedPanel {
    view: PanelView,
    sink: FieldSink,
}

struct PageModel {
    url: String,
    top_level: bool,
    next_id: u64,
    nodes: HashMap<ElementId, Node>,
    listeners: HashMap<ListenerId, (ElementId, FieldSink)>,
    observers: HashMap<ObserverId, FieldSink>,
    panels: BTreeMap<u64, MountedPanel>,
    error_log: Option<ErrorLogView>,
}

impl PageModel {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn node(&self, element: ElementId) -> Result<&Node, HostError> {
        self.nodes
            .get(&element)
            .ok_or(HostError::UnknownElement(element))
    }

    fn insert(&mut self, parent: ElementId, selectors: Vec<String>) -> ElementId {
        let id = ElementId(self.next_id());
        self.nodes.insert(id, Node::new(Some(parent), selectors));
        if let Some(parent) = self.nodes.get_mut(&parent) {
            parent.children.push(id);
        }
        id
    }

    fn remove_subtree(&mut self, element: ElementId) {
        if let Some(node) = self.nodes.remove(&element) {
            if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
                parent.children.retain(|&c| c != element);
            }
            for child in node.children {
                self.remove_subtree(child);
            }
        }
    }

    /// Walks up to the body; false for nodes cut off from it
    fn is_attached(&self, element: ElementId) -> bool {
        let mut current = element;
        loop {
            if current == BODY {
                return true;
            }
            match self.nodes.get(&current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn is_rendered(&self, element: ElementId) -> bool {
        if !self.is_attached(element) {
            return false;
        }
        let mut current = Some(element);
        while let Some(id) = current {
            match self.nodes.get(&id) {
                Some(node) if node.hidden => return false,
                Some(node) => current = node.parent,
                None => return false,
            }
        }
        true
    }

    /// Attached elements in document order
    fn document_order(&self) -> Vec<ElementId> {
        let mut order = Vec::new();
        let mut stack = vec![BODY];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some(node) = self.nodes.get(&id) {
                stack.extend(node.children.iter().rev());
            }
        }
        order
    }

    fn mutated(&self) {
        for sink in self.observers.values() {
            sink.emit(FieldEvent::PageMutated);
        }
    }
}

pub struct VirtualPage {
    model: Mutex<PageModel>,
}

impl VirtualPage {
    pub fn new(url: impl Into<String>) -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(BODY, Node::new(None, vec!["body".to_string()]));

        Self {
            model: Mutex::new(PageModel {
                url: url.into(),
                top_level: true,
                next_id: 0,
                nodes,
                listeners: HashMap::new(),
                observers: HashMap::new(),
                panels: BTreeMap::new(),
                error_log: None,
            }),
        }
    }

    /// A page loaded inside an embedded frame
    pub fn framed(url: impl Into<String>) -> Self {
        let page = Self::new(url);
        page.model().top_level = false;
        page
    }

    fn model(&self) -> MutexGuard<'_, PageModel> {
        self.model.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn body(&self) -> ElementId {
        BODY
    }

    /// Soft navigation: the URL changes, the document stays
    pub fn navigate(&self, url: impl Into<String>) {
        self.model().url = url.into();
    }

    pub fn add_element(&self, parent: ElementId, selectors: &[&str]) -> ElementId {
        let mut model = self.model();
        let id = model.insert(parent, selectors.iter().map(|s| s.to_string()).collect());
        model.mutated();
        id
    }

    /// Nest `depth` anonymous containers under `parent`; returns the innermost
    pub fn add_containers(&self, parent: ElementId, depth: usize) -> ElementId {
        (0..depth).fold(parent, |parent, _| self.add_element(parent, &["div"]))
    }

    pub fn set_text(&self, element: ElementId, text: &str) {
        if let Some(node) = self.model().nodes.get_mut(&element) {
            node.text = text.to_string();
        }
    }

    pub fn text(&self, element: ElementId) -> Option<String> {
        self.model().nodes.get(&element).map(|n| n.text.clone())
    }

    /// What a user typing does: replace the text and fire the input event
    pub fn type_text(&self, element: ElementId, text: &str) {
        self.set_text(element, text);
        self.notify_input(element);
    }

    /// Cut `element` out of the tree while keeping the node itself around
    pub fn detach(&self, element: ElementId) {
        let mut model = self.model();
        let parent = model.nodes.get_mut(&element).and_then(|n| n.parent.take());
        if let Some(parent) = parent.and_then(|p| model.nodes.get_mut(&p)) {
            parent.children.retain(|&c| c != element);
        }
        model.mutated();
    }

    pub fn set_hidden(&self, element: ElementId, hidden: bool) {
        let mut model = self.model();
        if let Some(node) = model.nodes.get_mut(&element) {
            node.hidden = hidden;
        }
        model.mutated();
    }

    pub fn panels(&self) -> Vec<PanelView> {
        self.model().panels.values().map(|p| p.view.clone()).collect()
    }

    pub fn panel(&self, panel: PanelId) -> Option<PanelView> {
        self.model().panels.get(&panel.0).map(|p| p.view.clone())
    }

    /// Panel mounted on `anchor`, if any
    pub fn panel_on(&self, anchor: ElementId) -> Option<PanelView> {
        self.model()
            .panels
            .values()
            .find(|p| p.view.anchor == anchor)
            .map(|p| p.view.clone())
    }

    pub fn select_from(&self, panel: PanelId, code: &str) {
        self.with_panel(panel, |p| {
            p.view.from = code.to_string();
            p.sink.emit(FieldEvent::FromLanguageSelected(code.to_string()));
        });
    }

    pub fn select_to(&self, panel: PanelId, code: &str) {
        self.with_panel(panel, |p| {
            p.view.to = code.to_string();
            p.sink.emit(FieldEvent::ToLanguageSelected(code.to_string()));
        });
    }

    pub fn press_swap(&self, panel: PanelId) {
        self.with_panel(panel, |p| p.sink.emit(FieldEvent::SwapRequested));
    }

    fn with_panel(&self, panel: PanelId, f: impl FnOnce(&mut MountedPanel)) {
        match self.model().panels.get_mut(&panel.0) {
            Some(mounted) => f(mounted),
            None => tracing::warn!(?panel, "no such panel"),
        }
    }

    pub fn error_log(&self) -> Option<ErrorLogView> {
        self.model().error_log.clone()
    }

    /// The close button of the error overlay
    pub fn close_error_log(&self) {
        if let Some(log) = self.model().error_log.as_mut() {
            log.visible = false;
        }
    }

    pub fn listener_count(&self) -> usize {
        self.model().listeners.len()
    }

    pub fn observer_count(&self) -> usize {
        self.model().observers.len()
    }
}

impl PageHost for VirtualPage {
    fn current_url(&self) -> String {
        self.model().url.clone()
    }

    fn is_top_level(&self) -> bool {
        self.model().top_level
    }

    fn query_all(&self, selector: &str, limit: usize) -> Vec<ElementId> {
        let model = self.model();
        model
            .document_order()
            .into_iter()
            .filter(|id| {
                model
                    .nodes
                    .get(id)
                    .is_some_and(|n| n.selectors.iter().any(|s| s == selector))
            })
            .take(limit)
            .collect()
    }

    fn is_attached(&self, element: ElementId) -> bool {
        self.model().is_attached(element)
    }

    fn is_rendered(&self, element: ElementId) -> bool {
        self.model().is_rendered(element)
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.model().nodes.get(&element).and_then(|n| n.parent)
    }

    fn read_content(&self, element: ElementId, kind: ContentKind) -> Result<String, HostError> {
        let model = self.model();
        let text = &model.node(element)?.text;
        Ok(match kind {
            ContentKind::Text => text.clone(),
            ContentKind::Markup => text_to_markup(text),
        })
    }

    fn write_content(
        &self,
        element: ElementId,
        kind: ContentKind,
        value: &str,
    ) -> Result<(), HostError> {
        let mut model = self.model();
        if !model.is_attached(element) {
            return Err(HostError::Detached(element));
        }
        let node = model
            .nodes
            .get_mut(&element)
            .ok_or(HostError::UnknownElement(element))?;
        node.text = match kind {
            ContentKind::Text => value.to_string(),
            ContentKind::Markup => markup_to_text(value),
        };
        Ok(())
    }

    fn notify_input(&self, element: ElementId) {
        let model = self.model();
        for (target, sink) in model.listeners.values() {
            if *target == element {
                sink.emit(FieldEvent::InputChanged);
            }
        }
    }

    fn listen_input(&self, element: ElementId, sink: FieldSink) -> ListenerId {
        let mut model = self.model();
        let id = ListenerId(model.next_id());
        model.listeners.insert(id, (element, sink));
        id
    }

    fn unlisten_input(&self, listener: ListenerId) {
        self.model().listeners.remove(&listener);
    }

    fn observe_mutations(&self, sink: FieldSink) -> ObserverId {
        let mut model = self.model();
        let id = ObserverId(model.next_id());
        model.observers.insert(id, sink);
        id
    }

    fn disconnect(&self, observer: ObserverId) {
        self.model().observers.remove(&observer);
    }

    fn mount_panel(
        &self,
        anchor: ElementId,
        spec: &PanelSpec,
        sink: FieldSink,
    ) -> Result<PanelId, HostError> {
        let mut model = self.model();
        if !model.is_attached(anchor) {
            return Err(HostError::Detached(anchor));
        }

        let element = model.insert(anchor, vec!["oyt-panel".to_string()]);
        let id = PanelId(element.0);
        let auto_label = spec
            .from_select
            .label_of(AUTO)
            .unwrap_or_default()
            .to_string();
        model.panels.insert(
            id.0,
            MountedPanel {
                view: PanelView {
                    id,
                    anchor,
                    element,
                    spec: spec.clone(),
                    output: spec.initial_output.clone(),
                    auto_label,
                    from: spec.from_select.selected.clone(),
                    to: spec.to_select.selected.clone(),
                },
                sink,
            },
        );
        model.mutated();
        Ok(id)
    }

    fn update_panel(&self, panel: PanelId, update: PanelUpdate) {
        let mut model = self.model();
        let Some(mounted) = model.panels.get_mut(&panel.0) else {
            tracing::warn!(?panel, "update for unknown panel");
            return;
        };
        match update {
            PanelUpdate::SetOutput(html) => mounted.view.output = html,
            PanelUpdate::SetAutoOptionLabel(label) => mounted.view.auto_label = label,
            PanelUpdate::SelectLanguages { from, to } => {
                mounted.view.from = from;
                mounted.view.to = to;
            }
        }
    }

    fn remove_panel(&self, panel: PanelId) {
        let mut model = self.model();
        if let Some(mounted) = model.panels.remove(&panel.0) {
            model.remove_subtree(mounted.view.element);
            model.mutated();
        }
    }

    fn show_error(&self, entry: &str) {
        let mut model = self.model();
        let log = model.error_log.get_or_insert_with(ErrorLogView::default);
        log.entries.push(entry.to_string());
        log.visible = true;
    }
}
