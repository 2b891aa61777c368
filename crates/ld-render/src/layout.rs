//! Headless box layout.
//!
//! In a browser the host measures every element and reports bounds through
//! [`RenderTree::set_bounds`]. Without a host (tests, server-side previews)
//! this module stacks elements the way the flex containers would: rows lay
//! children out left to right, everything else top to bottom. Sizes are
//! estimates, good enough for drop-zone geometry.

use crate::bounds::Bounds;
use crate::tree::{RenderId, RenderTree};
use ld_core::{ElementKind, FlexDirection};
use std::collections::HashMap;

const GAP: f32 = 8.0;
const PAD: f32 = 8.0;
const CHAR_WIDTH: f32 = 8.0;
const LINE_HEIGHT: f32 = 32.0;
/// Matches the `min-height` of the placeholder style.
const MIN_CONTAINER_HEIGHT: f32 = 40.0;
const MIN_WIDTH: f32 = 40.0;

/// The canvas (viewport) dimensions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

fn axis_of(tree: &RenderTree, id: RenderId) -> Axis {
    match tree.get(id) {
        Some(el) if el.kind == ElementKind::Flex => {
            match FlexDirection::from_attributes(&el.attributes) {
                FlexDirection::Row => Axis::Horizontal,
                FlexDirection::Column => Axis::Vertical,
            }
        }
        _ => Axis::Vertical,
    }
}

/// Assign bounds to every element of `tree`. The root is stretched to the
/// viewport width.
pub fn resolve_layout(tree: &mut RenderTree, viewport: Viewport) {
    let Some(root) = tree.root() else {
        return;
    };
    let mut sizes = HashMap::new();
    measure(tree, root, &mut sizes);
    if let Some(size) = sizes.get_mut(&root) {
        size.0 = size.0.max(viewport.width);
    }
    place(tree, root, 0.0, 0.0, &sizes);
}

fn measure(tree: &RenderTree, id: RenderId, sizes: &mut HashMap<RenderId, (f32, f32)>) -> (f32, f32) {
    let Some(el) = tree.get(id) else {
        return (0.0, 0.0);
    };
    let children = el.children.clone();
    let label = el
        .placeholder
        .as_deref()
        .or(el.text.as_deref())
        .unwrap_or_default();
    let label_width = label.chars().count() as f32 * CHAR_WIDTH;

    let size = if children.is_empty() {
        let height = if el.kind.is_container() {
            MIN_CONTAINER_HEIGHT
        } else {
            LINE_HEIGHT
        };
        ((label_width + 2.0 * PAD).max(MIN_WIDTH), height)
    } else {
        let measured: Vec<(f32, f32)> = children.iter().map(|&c| measure(tree, c, sizes)).collect();
        let gaps = GAP * (measured.len().saturating_sub(1)) as f32;
        let (w, h) = match axis_of(tree, id) {
            Axis::Horizontal => (
                measured.iter().map(|s| s.0).sum::<f32>() + gaps,
                measured.iter().map(|s| s.1).fold(0.0, f32::max),
            ),
            Axis::Vertical => (
                measured.iter().map(|s| s.0).fold(0.0, f32::max),
                measured.iter().map(|s| s.1).sum::<f32>() + gaps,
            ),
        };
        (
            (w + 2.0 * PAD).max(MIN_WIDTH),
            (h + 2.0 * PAD).max(MIN_CONTAINER_HEIGHT),
        )
    };
    sizes.insert(id, size);
    size
}

fn place(tree: &mut RenderTree, id: RenderId, x: f32, y: f32, sizes: &HashMap<RenderId, (f32, f32)>) {
    let (width, height) = sizes.get(&id).copied().unwrap_or_default();
    tree.set_bounds(id, Bounds::new(x, y, width, height));

    let children = tree.get(id).map(|el| el.children.clone()).unwrap_or_default();
    let axis = axis_of(tree, id);
    let (mut cx, mut cy) = (x + PAD, y + PAD);
    for child in children {
        place(tree, child, cx, cy, sizes);
        let (cw, ch) = sizes.get(&child).copied().unwrap_or_default();
        match axis {
            Axis::Horizontal => cx += cw + GAP,
            Axis::Vertical => cy += ch + GAP,
        }
    }
}
