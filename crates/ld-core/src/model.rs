//! The live element tree.
//!
//! A document is an ordered tree of `ElementNode` values stored in a stable
//! graph arena. Edges go parent → child; a node's single incoming edge is
//! its parent link. Child order lives on the parent (`children`) and is
//! authoritative for both visual layout and serialization.
//!
//! Mutations never re-render anything themselves. Each one queues a
//! [`Change`] and updates [`MutationMeta`]; the owner of the document drains
//! the queue once per render pass.

use crate::data::{Attributes, ElementData, is_preview};
use crate::error::TreeError;
use crate::kind::{ElementKind, FlexDirection};
use crate::tag::Tag;
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use smallvec::SmallVec;

// ─── Nodes ───────────────────────────────────────────────────────────────

/// One element of the live document.
#[derive(Debug, Clone)]
pub struct ElementNode {
    pub tag: Tag,

    /// Tag-specific behavior, fixed at construction by the factory.
    pub kind: ElementKind,

    pub attributes: Attributes,

    pub text: Option<String>,

    /// Child handles in visual order.
    children: SmallVec<[NodeIndex; 4]>,
}

impl ElementNode {
    /// Factory entry point for a single node: picks the kind from the tag.
    /// Children are wired separately by [`Document`].
    pub fn from_data(data: &ElementData) -> Self {
        let tag = if data.tag.as_str().is_empty() {
            Tag::default()
        } else {
            data.tag
        };
        Self {
            tag,
            kind: ElementKind::from_tag(tag),
            attributes: data.attributes.clone(),
            text: data.text.clone(),
            children: SmallVec::new(),
        }
    }

    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    pub fn is_preview(&self) -> bool {
        is_preview(&self.attributes)
    }

    /// Main axis, meaningful for flex containers.
    pub fn flex_direction(&self) -> FlexDirection {
        FlexDirection::from_attributes(&self.attributes)
    }

    /// Empty-state text for containers.
    pub fn placeholder_text(&self) -> Option<String> {
        self.kind.placeholder_text(self.tag, &self.attributes)
    }
}

// ─── Change tracking ─────────────────────────────────────────────────────

/// What kind of re-render a mutation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    /// The tree changed: re-render, rebuild drop zones, maybe record history.
    Tree,
    /// Only preview elements changed: re-render, never record history.
    Preview,
}

/// Metadata about the mutations since the last render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MutationMeta {
    /// Whether the next render pass should append a history entry.
    pub store_history: bool,
}

// ─── Document ────────────────────────────────────────────────────────────

/// The element tree plus mutation metadata.
#[derive(Debug, Clone)]
pub struct Document {
    graph: StableDiGraph<ElementNode, ()>,
    root: NodeIndex,
    meta: MutationMeta,
    pending: Vec<Change>,
}

impl Document {
    /// Build a document from a root record via the factory.
    #[must_use]
    pub fn new(root: &ElementData) -> Self {
        let mut graph = StableDiGraph::new();
        let root = build(&mut graph, root);
        Self {
            graph,
            root,
            meta: MutationMeta::default(),
            pending: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    pub fn get(&self, idx: NodeIndex) -> Option<&ElementNode> {
        self.graph.node_weight(idx)
    }

    /// Children of `idx` in order; empty for unknown handles.
    pub fn children(&self, idx: NodeIndex) -> &[NodeIndex] {
        self.graph
            .node_weight(idx)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// The parent of `idx`. `None` for the root, detached and unknown nodes.
    pub fn parent(&self, idx: NodeIndex) -> Option<NodeIndex> {
        if !self.graph.contains_node(idx) {
            return None;
        }
        self.graph.neighbors_directed(idx, Direction::Incoming).next()
    }

    /// Position of `idx` within its parent's children.
    pub fn index_in_parent(&self, idx: NodeIndex) -> Option<usize> {
        let parent = self.parent(idx)?;
        self.children(parent).iter().position(|&c| c == idx)
    }

    /// True if `idx` is reachable from the root.
    pub fn is_attached(&self, idx: NodeIndex) -> bool {
        if !self.graph.contains_node(idx) {
            return false;
        }
        let mut current = idx;
        loop {
            if current == self.root {
                return true;
            }
            match self.parent(current) {
                Some(p) => current = p,
                None => return false,
            }
        }
    }

    /// Check if `ancestor` is a parent/grandparent/etc. of `descendant`.
    pub fn is_ancestor_of(&self, ancestor: NodeIndex, descendant: NodeIndex) -> bool {
        if ancestor == descendant {
            return false;
        }
        let mut current = descendant;
        while let Some(parent) = self.parent(current) {
            if parent == ancestor {
                return true;
            }
            current = parent;
        }
        false
    }

    /// Pre-order traversal of the subtree rooted at `idx`.
    pub fn descendants(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        if self.graph.contains_node(idx) {
            self.collect_preorder(idx, &mut out);
        }
        out
    }

    fn collect_preorder(&self, idx: NodeIndex, out: &mut Vec<NodeIndex>) {
        out.push(idx);
        for &child in self.children(idx) {
            self.collect_preorder(child, out);
        }
    }

    /// Number of nodes reachable from the root.
    pub fn len(&self) -> usize {
        self.descendants(self.root).len()
    }

    /// A document always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// True if any descendant of `idx` carries the preview marker.
    pub fn has_preview_elements(&self, idx: NodeIndex) -> bool {
        self.children(idx).iter().any(|&c| {
            self.get(c).is_some_and(ElementNode::is_preview) || self.has_preview_elements(c)
        })
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Construct a node (and its subtree) from `data` and insert it under
    /// `parent` at `index`, or append when `index` is `None`.
    ///
    /// Children at or after `index` shift right by one. Inserting a
    /// preview-marked element queues a preview change and leaves the
    /// history flag alone.
    pub fn add_child(
        &mut self,
        parent: NodeIndex,
        data: &ElementData,
        index: Option<usize>,
    ) -> Result<NodeIndex, TreeError> {
        let len = self
            .get(parent)
            .ok_or(TreeError::UnknownNode(parent))?
            .children
            .len();
        if let Some(index) = index
            && index > len
        {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        let child = build(&mut self.graph, data);
        self.link(parent, child, index);
        Ok(child)
    }

    /// Insert an existing detached node under `parent`.
    pub fn attach(
        &mut self,
        parent: NodeIndex,
        child: NodeIndex,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        let len = self
            .get(parent)
            .ok_or(TreeError::UnknownNode(parent))?
            .children
            .len();
        if !self.graph.contains_node(child) {
            return Err(TreeError::UnknownNode(child));
        }
        if child == self.root {
            return Err(TreeError::Root);
        }
        if self.parent(child).is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if child == parent || self.is_ancestor_of(child, parent) {
            return Err(TreeError::Cycle { child });
        }
        if let Some(index) = index
            && index > len
        {
            return Err(TreeError::IndexOutOfBounds { index, len });
        }
        self.link(parent, child, index);
        Ok(())
    }

    fn link(&mut self, parent: NodeIndex, child: NodeIndex, index: Option<usize>) {
        self.graph.add_edge(parent, child, ());
        if let Some(node) = self.graph.node_weight_mut(parent) {
            match index {
                Some(i) => node.children.insert(i, child),
                None => node.children.push(child),
            }
        }
        let preview = self.get(child).is_some_and(ElementNode::is_preview);
        if preview {
            self.pending.push(Change::Preview);
        } else {
            self.meta.store_history = true;
            self.pending.push(Change::Tree);
        }
    }

    /// Unlink `child` from its parent, keeping its subtree alive in the
    /// arena. Returns the former parent and position.
    ///
    /// This is the first half of a move and does not mark history.
    pub fn detach(&mut self, child: NodeIndex) -> Result<(NodeIndex, usize), TreeError> {
        if child == self.root {
            return Err(TreeError::Root);
        }
        let parent = self.parent(child).ok_or(TreeError::UnknownNode(child))?;
        let position = self.unlink(parent, child);
        self.pending.push(Change::Tree);
        Ok((parent, position))
    }

    fn unlink(&mut self, parent: NodeIndex, child: NodeIndex) -> usize {
        if let Some(edge) = self.graph.find_edge(parent, child) {
            self.graph.remove_edge(edge);
        }
        let mut position = 0;
        if let Some(node) = self.graph.node_weight_mut(parent)
            && let Some(pos) = node.children.iter().position(|&c| c == child)
        {
            node.children.remove(pos);
            position = pos;
        }
        position
    }

    /// Delete a detached subtree from the arena.
    pub fn discard(&mut self, idx: NodeIndex) -> Result<(), TreeError> {
        if idx == self.root {
            return Err(TreeError::Root);
        }
        if !self.graph.contains_node(idx) {
            return Err(TreeError::UnknownNode(idx));
        }
        if self.parent(idx).is_some() {
            return Err(TreeError::AlreadyAttached(idx));
        }
        for node in self.descendants(idx) {
            self.graph.remove_node(node);
        }
        Ok(())
    }

    /// Remove `idx` and its subtree from the document. Returns the removed
    /// subtree in plain form. Handles into it are invalid afterwards.
    pub fn remove(&mut self, idx: NodeIndex) -> Result<ElementData, TreeError> {
        self.detach(idx)?;
        let removed = self.serialize(idx).unwrap_or_default();
        self.discard(idx)?;
        self.meta.store_history = true;
        log::debug!("removed <{}> ({} nodes)", removed.tag, removed.count());
        Ok(removed)
    }

    /// Remove every preview-marked child of `parent`. Returns how many were
    /// removed.
    pub fn clear_previews(&mut self, parent: NodeIndex) -> usize {
        let previews: Vec<NodeIndex> = self
            .children(parent)
            .iter()
            .copied()
            .filter(|&c| self.get(c).is_some_and(ElementNode::is_preview))
            .collect();
        for &p in &previews {
            self.unlink(parent, p);
            for node in self.descendants(p) {
                self.graph.remove_node(node);
            }
        }
        if !previews.is_empty() {
            self.pending.push(Change::Preview);
        }
        previews.len()
    }

    pub fn set_text(&mut self, idx: NodeIndex, text: Option<String>) -> Result<(), TreeError> {
        let node = self
            .graph
            .node_weight_mut(idx)
            .ok_or(TreeError::UnknownNode(idx))?;
        node.text = text;
        self.commit();
        Ok(())
    }

    pub fn set_attribute(&mut self, idx: NodeIndex, key: &str, value: &str) -> Result<(), TreeError> {
        let node = self
            .graph
            .node_weight_mut(idx)
            .ok_or(TreeError::UnknownNode(idx))?;
        node.attributes.insert(key.to_string(), value.to_string());
        self.commit();
        Ok(())
    }

    /// Replace the whole attribute map.
    pub fn set_attributes(&mut self, idx: NodeIndex, attributes: Attributes) -> Result<(), TreeError> {
        let node = self
            .graph
            .node_weight_mut(idx)
            .ok_or(TreeError::UnknownNode(idx))?;
        node.attributes = attributes;
        self.commit();
        Ok(())
    }

    /// Throw away the current tree and build a new one from `data`.
    /// Every existing handle becomes invalid.
    pub fn replace_root(&mut self, data: &ElementData) {
        self.graph = StableDiGraph::new();
        self.root = build(&mut self.graph, data);
        self.commit();
    }

    fn commit(&mut self) {
        self.meta.store_history = true;
        self.pending.push(Change::Tree);
    }

    // ─── Render-pass bookkeeping ─────────────────────────────────────────

    pub fn meta(&self) -> MutationMeta {
        self.meta
    }

    /// Keep the next render pass from recording history (rehydration,
    /// cancelled moves).
    pub fn suppress_history(&mut self) {
        self.meta.store_history = false;
    }

    pub fn has_pending_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drain queued changes and reset the metadata for the next pass.
    pub fn take_changes(&mut self) -> (Vec<Change>, MutationMeta) {
        let meta = std::mem::take(&mut self.meta);
        (std::mem::take(&mut self.pending), meta)
    }

    // ─── Serialization ───────────────────────────────────────────────────

    /// Plain projection of the subtree at `idx`. Preview-marked elements
    /// are left out.
    pub fn serialize(&self, idx: NodeIndex) -> Option<ElementData> {
        let node = self.get(idx)?;
        Some(ElementData {
            tag: node.tag,
            attributes: node.attributes.clone(),
            text: node.text.clone(),
            children: node
                .children
                .iter()
                .filter(|&&c| !self.get(c).is_some_and(ElementNode::is_preview))
                .filter_map(|&c| self.serialize(c))
                .collect(),
        })
    }

    /// Plain projection of the whole document.
    pub fn to_data(&self) -> ElementData {
        self.serialize(self.root).unwrap_or_default()
    }
}

/// Recursive factory: build `data` and its children into `graph`, wiring
/// parent edges before returning the new subtree's root.
fn build(graph: &mut StableDiGraph<ElementNode, ()>, data: &ElementData) -> NodeIndex {
    let idx = graph.add_node(ElementNode::from_data(data));
    for child_data in &data.children {
        let child = build(graph, child_data);
        graph.add_edge(idx, child, ());
        if let Some(node) = graph.node_weight_mut(idx) {
            node.children.push(child);
        }
    }
    idx
}
