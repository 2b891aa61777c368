//! The live rendered representation of a document.
//!
//! `RenderTree::render` produces one `RenderedElement` per document node,
//! copying tag, attributes and text, marking the selection and showing an
//! empty-state placeholder inside childless containers. Every call discards
//! the previous tree and rebuilds it; there is no diffing. Bounding boxes
//! are attached afterwards, either measured by the host or computed by
//! [`crate::layout`].
//!
//! Drag previews live only here: they are inserted into and removed from
//! the rendered tree, never the document.

use crate::bounds::Bounds;
use ld_core::{Attributes, Document, ElementData, ElementKind, NodeIndex, PREVIEW_ATTR, PREVIEW_VALUE, Tag};
use serde::Serialize;
use std::collections::HashMap;

/// Class added to the rendered element of the selected node.
pub const HIGHLIGHT_CLASS: &str = "highlighted";

/// Inline style of a container while it shows its empty-state text.
pub const PLACEHOLDER_STYLE: &str = "border-radius: 8px;min-height: 40px;border: 1px dashed #ddd; color: #ccc; font-size: 12px;align-items: center; justify-content: center;";

/// Handle to a rendered element. Valid until the next full render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RenderId(usize);

impl RenderId {
    pub fn index(self) -> usize {
        self.0
    }

    /// Rebuild a handle from an index handed out to the host.
    pub fn from_index(index: usize) -> Self {
        RenderId(index)
    }
}

/// One live element.
#[derive(Debug, Clone)]
pub struct RenderedElement {
    pub tag: Tag,
    pub kind: ElementKind,
    pub attributes: Attributes,
    pub text: Option<String>,
    /// Empty-state text, present while the placeholder is showing.
    pub placeholder: Option<String>,
    pub children: Vec<RenderId>,
    pub parent: Option<RenderId>,
    /// The document node this element was rendered from. `None` inside
    /// drag previews.
    pub source: Option<NodeIndex>,
    pub highlighted: bool,
    /// Part of a drag preview (or rendered from a preview-marked node).
    pub preview: bool,
    pub bounds: Option<Bounds>,
}

impl RenderedElement {
    /// Attributes as they appear on the live element, including the
    /// selection class and the placeholder style.
    pub fn live_attributes(&self) -> Attributes {
        let mut attrs = self.attributes.clone();
        if self.highlighted {
            let class = match attrs.get("class") {
                Some(existing) if !existing.is_empty() => format!("{existing} {HIGHLIGHT_CLASS}"),
                _ => HIGHLIGHT_CLASS.to_string(),
            };
            attrs.insert("class".to_string(), class);
        }
        if self.placeholder.is_some() {
            attrs.insert("style".to_string(), PLACEHOLDER_STYLE.to_string());
        }
        attrs
    }
}

/// Serializable view of a rendered subtree, handed to hosts that build the
/// real DOM from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub id: RenderId,
    pub tag: Tag,
    pub attributes: Attributes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    pub preview: bool,
    pub children: Vec<RenderSnapshot>,
}

#[derive(Debug, Default)]
pub struct RenderTree {
    nodes: Vec<Option<RenderedElement>>,
    root: Option<RenderId>,
    by_source: HashMap<NodeIndex, RenderId>,
    /// Slots emptied by removed previews, reused by the next allocation.
    vacant: Vec<usize>,
}

impl RenderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard the current tree and render `doc` from scratch.
    pub fn render(&mut self, doc: &Document, selection: Option<NodeIndex>) -> Option<RenderId> {
        self.clear();
        self.root = self.render_node(doc, doc.root(), None, selection);
        log::trace!("rendered {} elements", self.by_source.len());
        self.root
    }

    fn render_node(
        &mut self,
        doc: &Document,
        idx: NodeIndex,
        parent: Option<RenderId>,
        selection: Option<NodeIndex>,
    ) -> Option<RenderId> {
        let node = doc.get(idx)?;
        let id = self.alloc(RenderedElement {
            tag: node.tag,
            kind: node.kind,
            attributes: node.attributes.clone(),
            text: node.text.clone(),
            placeholder: None,
            children: Vec::new(),
            parent,
            source: Some(idx),
            highlighted: selection == Some(idx),
            preview: node.is_preview(),
            bounds: None,
        });
        self.by_source.insert(idx, id);
        for &child in doc.children(idx) {
            if let Some(child_id) = self.render_node(doc, child, Some(id), selection) {
                self.push_child(id, child_id);
            }
        }
        self.show_placeholder(id);
        Some(id)
    }

    fn render_data(&mut self, data: &ElementData, parent: Option<RenderId>) -> RenderId {
        let id = self.alloc(RenderedElement {
            tag: data.tag,
            kind: ElementKind::from_tag(data.tag),
            attributes: data.attributes.clone(),
            text: data.text.clone(),
            placeholder: None,
            children: Vec::new(),
            parent,
            source: None,
            highlighted: false,
            preview: true,
            bounds: None,
        });
        for child in &data.children {
            let child_id = self.render_data(child, Some(id));
            self.push_child(id, child_id);
        }
        self.show_placeholder(id);
        id
    }

    fn alloc(&mut self, element: RenderedElement) -> RenderId {
        if let Some(slot) = self.vacant.pop() {
            self.nodes[slot] = Some(element);
            return RenderId(slot);
        }
        let id = RenderId(self.nodes.len());
        self.nodes.push(Some(element));
        id
    }

    fn push_child(&mut self, parent: RenderId, child: RenderId) {
        if let Some(p) = self.get_mut(parent) {
            p.children.push(child);
        }
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.vacant.clear();
        self.by_source.clear();
        self.root = None;
    }

    pub fn root(&self) -> Option<RenderId> {
        self.root
    }

    pub fn get(&self, id: RenderId) -> Option<&RenderedElement> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: RenderId) -> Option<&mut RenderedElement> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// The element most recently rendered for a document node.
    pub fn rendered(&self, idx: NodeIndex) -> Option<RenderId> {
        self.by_source.get(&idx).copied()
    }

    /// Number of live elements, previews included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    // ─── Geometry ────────────────────────────────────────────────────────

    /// Record a measured bounding box. Returns `false` for stale handles.
    pub fn set_bounds(&mut self, id: RenderId, bounds: Bounds) -> bool {
        match self.get_mut(id) {
            Some(el) => {
                el.bounds = Some(bounds);
                true
            }
            None => false,
        }
    }

    pub fn bounds(&self, id: RenderId) -> Option<Bounds> {
        self.get(id).and_then(|el| el.bounds)
    }

    /// Find the deepest document node whose element contains (px, py).
    /// Later siblings win, matching paint order.
    pub fn hit_test(&self, px: f32, py: f32) -> Option<NodeIndex> {
        self.hit_test_element(self.root?, px, py)
    }

    fn hit_test_element(&self, id: RenderId, px: f32, py: f32) -> Option<NodeIndex> {
        let el = self.get(id)?;
        for &child in el.children.iter().rev() {
            if let Some(hit) = self.hit_test_element(child, px, py) {
                return Some(hit);
            }
        }
        match (el.source, el.bounds) {
            (Some(source), Some(b)) if !el.preview && b.contains(px, py) => Some(source),
            _ => None,
        }
    }

    // ─── Placeholders ────────────────────────────────────────────────────

    /// Show the empty-state text if `id` is a childless container.
    pub fn show_placeholder(&mut self, id: RenderId) {
        if let Some(el) = self.get_mut(id)
            && el.kind.is_container()
            && el.children.is_empty()
        {
            el.placeholder = el.kind.placeholder_text(el.tag, &el.attributes);
        }
    }

    pub fn hide_placeholder(&mut self, id: RenderId) {
        if let Some(el) = self.get_mut(id) {
            el.placeholder = None;
        }
    }

    // ─── Drag previews ───────────────────────────────────────────────────

    /// Render a placeholder for `data` (or a bare `div` when there is no
    /// drag data) and insert it into `parent` before the element of the
    /// `index`-th document child, or at the end when `index` is `None` or
    /// past the last child. The container's empty-state text is hidden
    /// while the preview is present.
    pub fn insert_preview(
        &mut self,
        parent: RenderId,
        index: Option<usize>,
        data: Option<&ElementData>,
        style: &str,
    ) -> Option<RenderId> {
        self.get(parent)?;
        let fallback = ElementData::new("div");
        let preview = self.render_data(data.unwrap_or(&fallback), Some(parent));
        if let Some(el) = self.get_mut(preview) {
            el.attributes.insert("style".to_string(), style.to_string());
            el.attributes
                .insert(PREVIEW_ATTR.to_string(), PREVIEW_VALUE.to_string());
        }
        self.hide_placeholder(parent);

        let position = {
            let siblings = self.get(parent).map(|p| p.children.as_slice()).unwrap_or(&[]);
            index.and_then(|i| {
                siblings
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| self.get(**c).is_some_and(|el| !el.preview))
                    .nth(i)
                    .map(|(pos, _)| pos)
            })
        };
        if let Some(p) = self.get_mut(parent) {
            match position {
                Some(pos) => p.children.insert(pos, preview),
                None => p.children.push(preview),
            }
        }
        Some(preview)
    }

    /// Remove a preview inserted by [`insert_preview`](Self::insert_preview)
    /// and restore the parent's empty-state text if it is empty again.
    pub fn remove_preview(&mut self, id: RenderId) -> bool {
        let parent = match self.get(id) {
            Some(el) if el.preview && el.source.is_none() => el.parent,
            _ => return false,
        };
        self.free(id);
        if let Some(parent) = parent {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|&c| c != id);
            }
            self.show_placeholder(parent);
        }
        true
    }

    fn free(&mut self, id: RenderId) {
        let children = self
            .get(id)
            .map(|el| el.children.clone())
            .unwrap_or_default();
        for child in children {
            self.free(child);
        }
        if let Some(slot) = self.nodes.get_mut(id.0)
            && slot.take().is_some()
        {
            self.vacant.push(id.0);
        }
    }

    /// Number of drag previews directly inside `parent`.
    pub fn preview_count(&self, parent: RenderId) -> usize {
        self.get(parent)
            .map(|p| {
                p.children
                    .iter()
                    .filter(|&&c| self.get(c).is_some_and(|el| el.preview && el.source.is_none()))
                    .count()
            })
            .unwrap_or(0)
    }

    // ─── Host output ─────────────────────────────────────────────────────

    /// Serializable copy of the subtree at `id`.
    pub fn snapshot(&self, id: RenderId) -> Option<RenderSnapshot> {
        let el = self.get(id)?;
        Some(RenderSnapshot {
            id,
            tag: el.tag,
            attributes: el.live_attributes(),
            text: el.text.clone(),
            placeholder: el.placeholder.clone(),
            preview: el.preview,
            children: el
                .children
                .iter()
                .filter_map(|&c| self.snapshot(c))
                .collect(),
        })
    }
}
