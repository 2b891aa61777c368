//! Drag preview state.
//!
//! At most one zone previews at a time. Entering a zone while another one
//! is previewing runs the leave path for the old zone first, so overlapping
//! enter/leave pairs from the host cannot leave a stale placeholder behind.
//! A leave for any zone other than the previewing one is ignored.
//!
//! Previews are inserted into the [`RenderTree`] only. They never touch the
//! document, so they never reach history or serialization.

use crate::drop_zones::DropZone;
use ld_core::{ElementData, NodeIndex};
use ld_render::{RenderId, RenderTree};

/// The zone currently showing a preview and the element it inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePreview {
    pub zone: DropZone,
    pub element: RenderId,
}

/// An existing node lifted out of the tree while it is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingMove {
    pub node: NodeIndex,
    pub parent: NodeIndex,
    pub index: usize,
}

/// What an `enter` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnterOutcome {
    /// Zone whose preview was removed to make room, if any.
    pub replaced: Option<DropZone>,
    pub element: RenderId,
}

#[derive(Debug, Default)]
pub struct DragSession {
    active: Option<ActivePreview>,
    moving: Option<PendingMove>,
}

impl DragSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<&ActivePreview> {
        self.active.as_ref()
    }

    pub fn is_previewing(&self) -> bool {
        self.active.is_some()
    }

    /// Idle → Previewing. Re-entering the previewing zone keeps the
    /// existing preview. Returns `None` when the zone's container is no
    /// longer rendered.
    pub fn enter(
        &mut self,
        tree: &mut RenderTree,
        zone: DropZone,
        data: Option<&ElementData>,
        style: &str,
    ) -> Option<EnterOutcome> {
        if let Some(active) = self.active
            && active.zone == zone
        {
            return Some(EnterOutcome {
                replaced: None,
                element: active.element,
            });
        }
        let replaced = self.finish(tree);
        let element = tree.insert_preview(zone.container, zone.index, data, style)?;
        log::trace!("preview shown in {:?} at {:?}", zone.parent, zone.index);
        self.active = Some(ActivePreview { zone, element });
        Some(EnterOutcome { replaced, element })
    }

    /// Previewing → Idle, only if `zone` is the previewing zone.
    pub fn leave(&mut self, tree: &mut RenderTree, zone: &DropZone) -> bool {
        match self.active {
            Some(active) if active.zone == *zone => self.finish(tree).is_some(),
            _ => false,
        }
    }

    /// Remove whatever preview is showing. Returns the zone that was
    /// previewing.
    pub fn finish(&mut self, tree: &mut RenderTree) -> Option<DropZone> {
        let active = self.active.take()?;
        tree.remove_preview(active.element);
        log::trace!("preview hidden in {:?}", active.zone.parent);
        Some(active.zone)
    }

    /// Forget the preview without touching the tree. Used after a full
    /// render, which has already discarded it.
    pub fn invalidate(&mut self) -> Option<DropZone> {
        self.active.take().map(|a| a.zone)
    }

    // ─── Moves ───────────────────────────────────────────────────────────

    pub fn begin_move(&mut self, pending: PendingMove) {
        self.moving = Some(pending);
    }

    pub fn pending_move(&self) -> Option<&PendingMove> {
        self.moving.as_ref()
    }

    pub fn take_move(&mut self) -> Option<PendingMove> {
        self.moving.take()
    }
}
