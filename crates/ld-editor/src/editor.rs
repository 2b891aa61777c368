//! The editor context.
//!
//! `Editor` owns everything one editing surface needs: the document, the
//! rendered tree, the drop zones derived from it, the history, the drag
//! session and the selection. Every public operation finishes with
//! [`Editor::flush`], so each one is a single render pass.
//!
//! Hosts observe the editor through [`Editor::subscribe`].

use crate::config::EditorConfig;
use crate::drop_zones::{DropZone, DropZones};
use crate::history::{History, SnapshotError};
use crate::preview::{DragSession, PendingMove};
use ld_core::{
    Attributes, Change, Document, DropPayload, ElementData, NodeIndex, PropertyTarget, TreeError,
};
use ld_render::{Bounds, RenderId, RenderTree, resolve_layout};

/// Notifications delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    /// The render tree and drop zones were rebuilt.
    Rendered,
    HistoryChanged { position: usize, len: usize },
    PreviewShown { zone: usize },
    PreviewHidden { zone: usize },
    SelectionChanged { node: Option<NodeIndex> },
}

pub type Listener = Box<dyn FnMut(&EditorEvent)>;

/// Handle returned by [`Editor::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(usize);

pub struct Editor {
    pub(crate) config: EditorConfig,
    pub(crate) document: Document,
    tree: RenderTree,
    zones: DropZones,
    pub(crate) history: History,
    session: DragSession,
    selection: Option<NodeIndex>,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: usize,
}

impl Editor {
    /// Create an editor on `config.default_root` and render it once.
    pub fn new(config: EditorConfig) -> Result<Self, SnapshotError> {
        let root = config.default_root.clone();
        Self::with_root(config, &root)
    }

    /// Create an editor on `root`. The initial history entry is `root`.
    pub fn with_root(config: EditorConfig, root: &ElementData) -> Result<Self, SnapshotError> {
        let document = Document::new(root);
        let history = History::new(&document.to_data(), config.history_limit)?;
        let mut editor = Self {
            config,
            document,
            tree: RenderTree::new(),
            zones: DropZones::new(),
            history,
            session: DragSession::new(),
            selection: None,
            listeners: Vec::new(),
            next_subscription: 0,
        };
        editor.render();
        Ok(editor)
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn render_tree(&self) -> &RenderTree {
        &self.tree
    }

    pub fn drop_zones(&self) -> &DropZones {
        &self.zones
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> Option<NodeIndex> {
        self.selection
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_previewing() || self.session.pending_move().is_some()
    }

    // ─── Observers ───────────────────────────────────────────────────────

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> Subscription {
        let id = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription);
        self.listeners.len() != before
    }

    fn emit(&mut self, event: EditorEvent) {
        for (_, listener) in &mut self.listeners {
            listener(&event);
        }
    }

    // ─── Render pass ─────────────────────────────────────────────────────

    /// Drain queued document changes: re-render, rebuild zones, and append
    /// a history entry when a committed change asked for one.
    pub fn flush(&mut self) {
        if !self.document.has_pending_changes() {
            return;
        }
        let (changes, meta) = self.document.take_changes();
        self.render();
        if meta.store_history && changes.contains(&Change::Tree) {
            match self.history.record(&self.document.to_data()) {
                Ok(()) => self.emit_history(),
                Err(e) => log::warn!("history snapshot skipped: {e}"),
            }
        }
    }

    fn render(&mut self) {
        if let Some(zone) = self.session.invalidate() {
            self.emit_preview_hidden(&zone);
        }
        self.tree.render(&self.document, self.selection);
        resolve_layout(&mut self.tree, self.config.viewport);
        self.zones.clear();
        self.zones.build_from(&self.document, &self.tree);
        self.emit(EditorEvent::Rendered);
    }

    fn emit_history(&mut self) {
        let event = EditorEvent::HistoryChanged {
            position: self.history.position(),
            len: self.history.len(),
        };
        self.emit(event);
    }

    fn emit_preview_hidden(&mut self, zone: &DropZone) {
        if let Some(zone) = self.zones.position_of(zone) {
            self.emit(EditorEvent::PreviewHidden { zone });
        }
    }

    // ─── Document edits ──────────────────────────────────────────────────

    /// Build `data` through the factory and insert it under `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeIndex,
        data: &ElementData,
        index: Option<usize>,
    ) -> Result<NodeIndex, TreeError> {
        let idx = self.document.add_child(parent, data, index)?;
        self.flush();
        Ok(idx)
    }

    /// Remove a node and its subtree. The root cannot be removed.
    pub fn remove(&mut self, node: NodeIndex) -> bool {
        let clears_selection = self
            .selection
            .is_some_and(|sel| sel == node || self.document.is_ancestor_of(node, sel));
        if self.document.remove(node).is_err() {
            return false;
        }
        if let Some(&pending) = self.session.pending_move()
            && self.document.get(pending.parent).is_none()
        {
            self.session.take_move();
            self.drop_lifted(pending.node);
        }
        if clears_selection {
            self.selection = None;
            self.emit(EditorEvent::SelectionChanged { node: None });
        }
        self.flush();
        true
    }

    pub fn set_text(&mut self, node: NodeIndex, text: Option<String>) -> Result<(), TreeError> {
        self.document.set_text(node, text)?;
        self.flush();
        Ok(())
    }

    pub fn set_attribute(&mut self, node: NodeIndex, key: &str, value: &str) -> Result<(), TreeError> {
        self.document.set_attribute(node, key, value)?;
        self.flush();
        Ok(())
    }

    pub fn set_attributes(&mut self, node: NodeIndex, attributes: Attributes) -> Result<(), TreeError> {
        self.document.set_attributes(node, attributes)?;
        self.flush();
        Ok(())
    }

    /// Replace a node's attributes from a JSON object. Malformed input is
    /// discarded and the previous attributes are kept.
    pub fn set_attributes_json(&mut self, node: NodeIndex, json: &str) -> bool {
        let attributes: Attributes = match serde_json::from_str(json) {
            Ok(a) => a,
            Err(e) => {
                log::debug!("ignoring attribute edit: {e}");
                return false;
            }
        };
        self.set_attributes(node, attributes).is_ok()
    }

    /// Write a property-panel edit to wherever its field points.
    pub fn apply_property(&mut self, node: NodeIndex, target: PropertyTarget, value: &str) -> bool {
        match target {
            PropertyTarget::Text => {
                let text = (!value.is_empty()).then(|| value.to_string());
                self.set_text(node, text).is_ok()
            }
            PropertyTarget::Attribute(key) => self.set_attribute(node, key, value).is_ok(),
            PropertyTarget::AttributesJson => self.set_attributes_json(node, value),
        }
    }

    /// Replace the whole document. The selection is cleared.
    pub(crate) fn replace_root(&mut self, data: &ElementData) {
        self.session.take_move();
        self.document.replace_root(data);
        self.clear_selection();
    }

    fn clear_selection(&mut self) {
        if self.selection.take().is_some() {
            self.emit(EditorEvent::SelectionChanged { node: None });
        }
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Record bounds measured by the host for a rendered element.
    pub fn set_bounds(&mut self, element: RenderId, bounds: Bounds) -> bool {
        self.tree.set_bounds(element, bounds)
    }

    /// Document node under a point, deepest first.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeIndex> {
        self.tree.hit_test(x, y)
    }

    // ─── Selection ───────────────────────────────────────────────────────

    /// Select a node (or nothing). Unknown nodes are ignored.
    pub fn select(&mut self, node: Option<NodeIndex>) -> bool {
        if let Some(n) = node
            && !self.document.is_attached(n)
        {
            return false;
        }
        if self.selection == node {
            return true;
        }
        self.selection = node;
        self.emit(EditorEvent::SelectionChanged { node });
        self.render();
        true
    }

    // ─── History ─────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let step = self.history.undo();
        self.rehydrate(step)
    }

    pub fn redo(&mut self) -> bool {
        let step = self.history.redo();
        self.rehydrate(step)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn rehydrate(&mut self, step: Result<Option<ElementData>, SnapshotError>) -> bool {
        match step {
            Ok(Some(data)) => {
                self.replace_root(&data);
                self.document.suppress_history();
                self.flush();
                self.emit_history();
                true
            }
            Ok(None) => false,
            Err(e) => {
                log::warn!("history step failed: {e}");
                false
            }
        }
    }

    // ─── Drag and drop ───────────────────────────────────────────────────

    /// Show a preview at `zone`. The payload is the JSON drag data; when it
    /// is absent or unusable a bare placeholder is shown instead.
    pub fn drag_enter(&mut self, zone: usize, payload: Option<&str>) -> bool {
        let Some(target) = self.zones.get(zone).copied() else {
            return false;
        };
        let data = payload
            .and_then(DropPayload::parse)
            .and_then(DropPayload::into_element);
        let style = self.config.preview_style.clone();
        let Some(outcome) = self.session.enter(&mut self.tree, target, data.as_ref(), &style) else {
            return false;
        };
        if let Some(replaced) = outcome.replaced {
            self.emit_preview_hidden(&replaced);
        }
        self.emit(EditorEvent::PreviewShown { zone });
        true
    }

    /// Remove the preview shown at `zone`, if it is the previewing zone.
    pub fn drag_leave(&mut self, zone: usize) -> bool {
        let Some(target) = self.zones.get(zone).copied() else {
            return false;
        };
        if !self.session.leave(&mut self.tree, &target) {
            return false;
        }
        self.emit(EditorEvent::PreviewHidden { zone });
        true
    }

    /// Commit a drop at `zone`. A payload without a tag is ignored. While
    /// an existing node is being moved, a successful drop completes the
    /// move.
    pub fn drop(&mut self, zone: usize, payload: &str) -> Option<NodeIndex> {
        let target = self.zones.get(zone).copied()?;
        if let Some(previewing) = self.session.finish(&mut self.tree) {
            self.emit_preview_hidden(&previewing);
        }
        let Some(data) = DropPayload::parse(payload).and_then(DropPayload::into_element) else {
            log::debug!("ignoring drop without a tag");
            return None;
        };
        let idx = match self.document.add_child(target.parent, &data, target.index) {
            Ok(idx) => idx,
            Err(e) => {
                log::warn!("drop rejected: {e}");
                return None;
            }
        };
        if let Some(moved) = self.session.take_move() {
            self.drop_lifted(moved.node);
        }
        self.flush();
        Some(idx)
    }

    /// End of a drag. Removes any preview left behind and puts a moved
    /// node back where it came from if it was never dropped.
    pub fn drag_end(&mut self) -> bool {
        let mut changed = false;
        if let Some(zone) = self.session.finish(&mut self.tree) {
            self.emit_preview_hidden(&zone);
            changed = true;
        }
        if let Some(pending) = self.session.take_move() {
            self.cancel_move(pending);
            changed = true;
        }
        changed
    }

    /// Lift an existing node out of the tree to drag it somewhere else.
    /// Returns the JSON payload to carry in the drag data.
    pub fn begin_move(&mut self, node: NodeIndex) -> Result<String, TreeError> {
        if let Some(pending) = self.session.take_move() {
            self.cancel_move(pending);
        }
        let payload = self
            .document
            .serialize(node)
            .ok_or(TreeError::UnknownNode(node))?
            .to_json();
        let (parent, index) = self.document.detach(node)?;
        self.session.begin_move(PendingMove { node, parent, index });
        if self.selection.is_some_and(|sel| sel == node || self.document.is_ancestor_of(node, sel)) {
            self.clear_selection();
        }
        self.flush();
        Ok(payload)
    }

    fn cancel_move(&mut self, pending: PendingMove) {
        let len = self.document.children(pending.parent).len();
        match self
            .document
            .attach(pending.parent, pending.node, Some(pending.index.min(len)))
        {
            Ok(()) => {
                self.document.suppress_history();
                log::debug!("move cancelled, node restored at {}", pending.index);
            }
            Err(e) => {
                log::warn!("could not restore moved node: {e}");
                self.drop_lifted(pending.node);
            }
        }
        self.flush();
    }

    /// Delete a lifted subtree for good, clearing a selection inside it.
    fn drop_lifted(&mut self, node: NodeIndex) {
        if self
            .selection
            .is_some_and(|sel| sel == node || self.document.is_ancestor_of(node, sel))
        {
            self.clear_selection();
        }
        if let Err(e) = self.document.discard(node) {
            log::warn!("moved node not discarded: {e}");
        }
    }
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("nodes", &self.document.len())
            .field("zones", &self.zones.len())
            .field("history", &(self.history.position(), self.history.len()))
            .field("selection", &self.selection)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn editor() -> Editor {
        Editor::new(EditorConfig::default()).unwrap()
    }

    fn recorder(editor: &mut Editor) -> Rc<RefCell<Vec<EditorEvent>>> {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        editor.subscribe(move |e| sink.borrow_mut().push(e.clone()));
        events
    }

    #[test]
    fn drop_commits_and_records_history() {
        let mut ed = editor();
        let idx = ed.drop(0, r#"{"tag":"gds-button","text":"Button"}"#).unwrap();
        assert_eq!(ed.document().get(idx).unwrap().text.as_deref(), Some("Button"));
        assert_eq!((ed.history().len(), ed.history().position()), (2, 1));
    }

    #[test]
    fn events_follow_drag_lifecycle() {
        let mut ed = editor();
        let events = recorder(&mut ed);
        assert!(ed.drag_enter(0, Some(r#"{"tag":"gds-card"}"#)));
        assert!(ed.drag_enter(1, None));
        assert!(ed.drag_leave(1));
        assert_eq!(
            events.borrow().clone(),
            vec![
                EditorEvent::PreviewShown { zone: 0 },
                EditorEvent::PreviewHidden { zone: 0 },
                EditorEvent::PreviewShown { zone: 1 },
                EditorEvent::PreviewHidden { zone: 1 },
            ]
        );
    }

    #[test]
    fn drag_enter_does_not_touch_history() {
        let mut ed = editor();
        ed.drag_enter(0, Some(r#"{"tag":"gds-button"}"#));
        ed.drag_end();
        assert_eq!(ed.history().len(), 1);
        assert!(!ed.document().has_preview_elements(ed.document().root()));
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut ed = editor();
        let count = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);
        let sub = ed.subscribe(move |_| *sink.borrow_mut() += 1);
        ed.select(Some(ed.document().root()));
        let seen = *count.borrow();
        assert!(seen > 0);
        assert!(ed.unsubscribe(sub));
        ed.select(None);
        assert_eq!(*count.borrow(), seen);
    }

    #[test]
    fn selection_highlights_and_survives_edits() {
        let mut ed = editor();
        let root = ed.document().root();
        let child = ed.add_child(root, &ElementData::new("gds-button"), None).unwrap();
        assert!(ed.select(Some(child)));
        let rendered = ed.render_tree().rendered(child).unwrap();
        assert!(ed.render_tree().get(rendered).unwrap().highlighted);
        ed.set_text(child, Some("Go".into())).unwrap();
        assert_eq!(ed.selection(), Some(child));
    }

    #[test]
    fn removing_selected_node_clears_selection() {
        let mut ed = editor();
        let root = ed.document().root();
        let child = ed.add_child(root, &ElementData::new("gds-button"), None).unwrap();
        ed.select(Some(child));
        assert!(ed.remove(child));
        assert_eq!(ed.selection(), None);
        assert!(!ed.select(Some(child)));
        assert!(!ed.remove(root));
    }

    #[test]
    fn malformed_attribute_json_keeps_state() {
        let mut ed = editor();
        let root = ed.document().root();
        let before = ed.document().get(root).unwrap().attributes.clone();
        assert!(!ed.set_attributes_json(root, "{not json"));
        assert_eq!(ed.document().get(root).unwrap().attributes, before);
        assert_eq!(ed.history().len(), 1);

        assert!(ed.set_attributes_json(root, r#"{"gap":"s","flex-direction":"row"}"#));
        assert_eq!(
            ed.document().get(root).unwrap().attributes.get("gap").map(String::as_str),
            Some("s")
        );
        assert_eq!(ed.history().len(), 2);
    }

    #[test]
    fn property_fields_route_edits() {
        let mut ed = editor();
        let root = ed.document().root();
        let button = ed.add_child(root, &ElementData::new("gds-button"), None).unwrap();
        let kind = ed.document().get(button).unwrap().kind;
        for field in kind.properties() {
            let value = match field.target {
                PropertyTarget::Text => "Submit",
                PropertyTarget::Attribute(_) => field.default.unwrap_or("x"),
                PropertyTarget::AttributesJson => continue,
            };
            assert!(ed.apply_property(button, field.target, value), "{}", field.label);
        }
        let node = ed.document().get(button).unwrap();
        assert_eq!(node.text.as_deref(), Some("Submit"));
        assert_eq!(node.attributes.get("rank").map(String::as_str), Some("primary"));
        assert_eq!(node.attributes.get("size").map(String::as_str), Some("medium"));

        assert!(ed.apply_property(button, PropertyTarget::Text, ""));
        assert_eq!(ed.document().get(button).unwrap().text, None);
    }

    #[test]
    fn cancelled_move_restores_node_without_history() {
        let mut ed = editor();
        let root = ed.document().root();
        let a = ed.add_child(root, &ElementData::new("gds-button").with_text("a"), None).unwrap();
        ed.add_child(root, &ElementData::new("gds-button").with_text("b"), None).unwrap();
        let len = ed.history().len();

        let payload = ed.begin_move(a).unwrap();
        assert!(payload.contains(r#""text":"a""#));
        assert_eq!(ed.document().children(root).len(), 1);
        assert!(ed.drag_end());
        assert_eq!(ed.document().children(root).len(), 2);
        assert_eq!(ed.document().children(root)[0], a);
        assert_eq!(ed.history().len(), len);
    }

    #[test]
    fn completed_move_is_one_history_step() {
        let mut ed = editor();
        let root = ed.document().root();
        let a = ed.add_child(root, &ElementData::new("gds-button").with_text("a"), None).unwrap();
        ed.add_child(root, &ElementData::new("gds-button").with_text("b"), None).unwrap();
        let len = ed.history().len();

        let payload = ed.begin_move(a).unwrap();
        let trailing = ed.drop_zones().len() - 1;
        ed.drop(trailing, &payload).unwrap();
        ed.drag_end();

        let texts: Vec<_> = ed
            .document()
            .children(root)
            .iter()
            .map(|&c| ed.document().get(c).unwrap().text.clone().unwrap_or_default())
            .collect();
        assert_eq!(texts, vec!["b", "a"]);
        assert_eq!(ed.history().len(), len + 1);
        assert!(!ed.is_dragging());
    }

    #[test]
    fn lifted_node_cannot_be_selected() {
        let mut ed = editor();
        let root = ed.document().root();
        let card = ed.add_child(root, &ElementData::new("gds-card"), None).unwrap();
        let inner = ed.add_child(card, &ElementData::new("gds-button"), None).unwrap();
        assert!(ed.select(Some(inner)));

        let payload = ed.begin_move(card).unwrap();
        assert_eq!(ed.selection(), None);
        assert!(!ed.select(Some(card)));
        assert!(!ed.select(Some(inner)));

        let trailing = ed.drop_zones().len() - 1;
        let moved = ed.drop(trailing, &payload).unwrap();
        ed.drag_end();
        assert!(ed.document().get(inner).is_none());
        assert_eq!(ed.selection(), None);

        let fresh = ed.add_child(root, &ElementData::new("gds-button"), None).unwrap();
        assert_ne!(ed.selection(), Some(fresh));
        let rendered = ed.render_tree().rendered(fresh).unwrap();
        assert!(!ed.render_tree().get(rendered).unwrap().highlighted);
        assert!(ed.select(Some(moved)));
    }

    #[test]
    fn removing_origin_of_move_discards_lifted_node() {
        let mut ed = editor();
        let root = ed.document().root();
        let card = ed.add_child(root, &ElementData::new("gds-card"), None).unwrap();
        let button = ed.add_child(card, &ElementData::new("gds-button"), None).unwrap();

        ed.begin_move(button).unwrap();
        assert!(ed.remove(card));
        assert!(ed.document().get(button).is_none());
        assert!(!ed.is_dragging());
        assert!(!ed.drag_end());
        assert!(ed.document().children(root).is_empty());
    }

    #[test]
    fn moving_root_is_rejected() {
        let mut ed = editor();
        let root = ed.document().root();
        assert_eq!(ed.begin_move(root), Err(TreeError::Root));
        assert!(!ed.is_dragging());
    }
}
