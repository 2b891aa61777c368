//! Drop-zone geometry.
//!
//! After every render the editor walks the document in pre-order and asks
//! each node for its zones. Only flex and card containers produce any:
//!
//! - flex: a leading zone on the container (index 0), one zone on the
//!   trailing edge of every child but the last (index = child + 1), and a
//!   trailing zone on the container (index = child count)
//! - card: one zone on the bottom edge that appends
//!
//! Zones are anchored to rendered elements, not coordinates. The screen
//! point is read from the anchor's current bounds when asked for, so hosts
//! can re-measure without rebuilding the zone list.

use ld_core::{Document, ElementKind, FlexDirection, NodeIndex};
use ld_render::{Anchor, RenderId, RenderTree};
use smallvec::SmallVec;

/// A valid insertion point derived from the last render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropZone {
    /// Element whose edge the zone sits on.
    pub anchor: RenderId,
    pub position: Anchor,
    /// Rendered element of the container that receives the drop.
    pub container: RenderId,
    /// Document node that receives the drop.
    pub parent: NodeIndex,
    /// Insertion index, or `None` to append.
    pub index: Option<usize>,
}

impl DropZone {
    /// Screen position of the zone, from the anchor's current bounds.
    pub fn point(&self, tree: &RenderTree) -> Option<(f32, f32)> {
        tree.bounds(self.anchor).map(|b| b.anchor_point(self.position))
    }
}

/// Zones contributed by a single node. Nodes without a rendered element
/// contribute nothing.
pub fn zones_for(doc: &Document, tree: &RenderTree, idx: NodeIndex) -> SmallVec<[DropZone; 4]> {
    let mut zones = SmallVec::new();
    let (Some(node), Some(container)) = (doc.get(idx), tree.rendered(idx)) else {
        return zones;
    };

    match node.kind {
        ElementKind::Flex => {
            let (leading, trailing) = match node.flex_direction() {
                FlexDirection::Row => (Anchor::Left, Anchor::Right),
                FlexDirection::Column => (Anchor::Top, Anchor::Bottom),
            };
            let children = node.children();

            zones.push(DropZone {
                anchor: container,
                position: leading,
                container,
                parent: idx,
                index: Some(0),
            });
            if let Some((_, init)) = children.split_last() {
                for (i, &child) in init.iter().enumerate() {
                    if let Some(anchor) = tree.rendered(child) {
                        zones.push(DropZone {
                            anchor,
                            position: trailing,
                            container,
                            parent: idx,
                            index: Some(i + 1),
                        });
                    }
                }
            }
            zones.push(DropZone {
                anchor: container,
                position: trailing,
                container,
                parent: idx,
                index: Some(children.len()),
            });
        }
        ElementKind::Card => zones.push(DropZone {
            anchor: container,
            position: Anchor::Bottom,
            container,
            parent: idx,
            index: None,
        }),
        ElementKind::Generic | ElementKind::Button | ElementKind::RichText => {}
    }
    zones
}

/// The flat, ordered list of zones for the current render.
#[derive(Debug, Default, Clone)]
pub struct DropZones {
    zones: Vec<DropZone>,
}

impl DropZones {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// Append the zones of every node, parents before children. Call
    /// [`clear`](Self::clear) first for a fresh pass.
    pub fn build_from(&mut self, doc: &Document, tree: &RenderTree) {
        self.visit(doc, tree, doc.root());
        log::trace!("built {} drop zones", self.zones.len());
    }

    fn visit(&mut self, doc: &Document, tree: &RenderTree, idx: NodeIndex) {
        self.zones.extend(zones_for(doc, tree, idx));
        for &child in doc.children(idx) {
            self.visit(doc, tree, child);
        }
    }

    pub fn get(&self, zone: usize) -> Option<&DropZone> {
        self.zones.get(zone)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DropZone> {
        self.zones.iter()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Position of `zone` in the list.
    pub fn position_of(&self, zone: &DropZone) -> Option<usize> {
        self.zones.iter().position(|z| z == zone)
    }

    /// Zone whose screen point is closest to (px, py). Zones without
    /// measured bounds are skipped.
    pub fn nearest(&self, tree: &RenderTree, px: f32, py: f32) -> Option<usize> {
        self.zones
            .iter()
            .enumerate()
            .filter_map(|(i, z)| {
                let (x, y) = z.point(tree)?;
                Some((i, (x - px).powi(2) + (y - py).powi(2)))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ld_core::ElementData;
    use pretty_assertions::assert_eq;

    fn flex(direction: &str, children: usize) -> ElementData {
        let mut data = ElementData::new("gds-flex").with_attr("flex-direction", direction);
        for i in 0..children {
            data = data.with_child(ElementData::new("gds-button").with_text(&format!("b{i}")));
        }
        data
    }

    fn zones(doc: &Document) -> (RenderTree, DropZones) {
        let mut tree = RenderTree::new();
        tree.render(doc, None);
        let mut zones = DropZones::new();
        zones.build_from(doc, &tree);
        (tree, zones)
    }

    #[test]
    fn empty_row_has_leading_and_trailing() {
        let doc = Document::new(&flex("row", 0));
        let (tree, zones) = zones(&doc);
        let root = tree.rendered(doc.root()).unwrap();
        let got: Vec<_> = zones.iter().map(|z| (z.anchor, z.position, z.index)).collect();
        assert_eq!(
            got,
            vec![(root, Anchor::Left, Some(0)), (root, Anchor::Right, Some(0))]
        );
    }

    #[test]
    fn row_with_children_has_one_more_zone_than_children() {
        for k in 1..5 {
            let doc = Document::new(&flex("row", k));
            let (_, zones) = zones(&doc);
            assert_eq!(zones.len(), k + 1, "k = {k}");
        }
    }

    #[test]
    fn between_zones_sit_on_earlier_child() {
        let doc = Document::new(&flex("row", 3));
        let (tree, zones) = zones(&doc);
        let kids = doc.children(doc.root());
        let between: Vec<_> = zones
            .iter()
            .filter(|z| z.anchor != z.container)
            .map(|z| (z.anchor, z.position, z.index))
            .collect();
        assert_eq!(
            between,
            vec![
                (tree.rendered(kids[0]).unwrap(), Anchor::Right, Some(1)),
                (tree.rendered(kids[1]).unwrap(), Anchor::Right, Some(2)),
            ]
        );
        assert_eq!(zones.get(3).unwrap().index, Some(3));
    }

    #[test]
    fn column_anchors_top_and_bottom() {
        let doc = Document::new(&flex("column", 1));
        let (_, zones) = zones(&doc);
        let positions: Vec<_> = zones.iter().map(|z| z.position).collect();
        assert_eq!(positions, vec![Anchor::Top, Anchor::Bottom]);
    }

    #[test]
    fn unknown_direction_is_vertical() {
        let doc = Document::new(&flex("row-reverse", 0));
        let (_, zones) = zones(&doc);
        assert_eq!(zones.get(0).unwrap().position, Anchor::Top);
    }

    #[test]
    fn card_appends_at_bottom() {
        let doc = Document::new(&ElementData::new("gds-card"));
        let (_, zones) = zones(&doc);
        assert_eq!(zones.len(), 1);
        let z = zones.get(0).unwrap();
        assert_eq!((z.position, z.index), (Anchor::Bottom, None));
    }

    #[test]
    fn preorder_visits_nested_containers() {
        let doc = Document::new(
            &ElementData::new("gds-flex")
                .with_attr("flex-direction", "column")
                .with_child(ElementData::new("gds-card").with_child(flex("row", 0))),
        );
        let (_, zones) = zones(&doc);
        let card = doc.children(doc.root())[0];
        let inner = doc.children(card)[0];
        let parents: Vec<_> = zones.iter().map(|z| z.parent).collect();
        assert_eq!(
            parents,
            vec![doc.root(), doc.root(), card, inner, inner]
        );
    }

    #[test]
    fn unrendered_nodes_produce_no_zones() {
        let doc = Document::new(&flex("row", 2));
        let tree = RenderTree::new();
        let mut zones = DropZones::new();
        zones.build_from(&doc, &tree);
        assert!(zones.is_empty());
    }

    #[test]
    fn points_follow_anchor_bounds() {
        let doc = Document::new(&flex("row", 0));
        let (mut tree, zones) = zones(&doc);
        let leading = *zones.get(0).unwrap();
        assert_eq!(leading.point(&tree), None);
        tree.set_bounds(leading.anchor, ld_render::Bounds::new(0.0, 0.0, 100.0, 40.0));
        assert_eq!(leading.point(&tree), Some((0.0, 20.0)));
        assert_eq!(zones.get(1).unwrap().point(&tree), Some((100.0, 20.0)));
        assert_eq!(zones.nearest(&tree, 90.0, 10.0), Some(1));
    }
}
