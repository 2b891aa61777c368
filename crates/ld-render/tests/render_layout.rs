//! Integration tests: render + headless layout (ld-render).
//!
//! Renders documents, lays them out without a host, and checks that the
//! geometry drop zones read from is consistent.

use ld_core::{Document, ElementData};
use ld_render::{Anchor, RenderTree, Viewport, resolve_layout};

fn render(data: &ElementData) -> (Document, RenderTree) {
    let doc = Document::new(data);
    let mut tree = RenderTree::new();
    tree.render(&doc, None);
    resolve_layout(&mut tree, Viewport::default());
    (doc, tree)
}

#[test]
fn every_element_gets_bounds() {
    let (_, tree) = render(
        &ElementData::new("gds-flex")
            .with_attr("flex-direction", "column")
            .with_child(
                ElementData::new("gds-card").with_child(
                    ElementData::new("gds-flex")
                        .with_attr("flex-direction", "row")
                        .with_child(ElementData::new("gds-button").with_text("A"))
                        .with_child(ElementData::new("gds-button").with_text("B")),
                ),
            ),
    );
    let mut stack = vec![tree.root().unwrap()];
    while let Some(id) = stack.pop() {
        let el = tree.get(id).unwrap();
        assert!(el.bounds.is_some(), "{:?} has no bounds", el.tag);
        stack.extend(el.children.iter().copied());
    }
}

#[test]
fn children_sit_inside_parent() {
    let (doc, tree) = render(
        &ElementData::new("gds-flex")
            .with_attr("flex-direction", "row")
            .with_child(ElementData::new("gds-button").with_text("Left"))
            .with_child(ElementData::new("gds-button").with_text("Right")),
    );
    let parent = tree.bounds(tree.root().unwrap()).unwrap();
    for &child in doc.children(doc.root()) {
        let b = tree.bounds(tree.rendered(child).unwrap()).unwrap();
        assert!(parent.contains(b.x, b.y));
        assert!(parent.contains(b.x + b.width, b.y + b.height));
    }
}

#[test]
fn between_point_lies_between_siblings() {
    let (doc, tree) = render(
        &ElementData::new("gds-flex")
            .with_attr("flex-direction", "row")
            .with_child(ElementData::new("gds-button").with_text("Left"))
            .with_child(ElementData::new("gds-button").with_text("Right")),
    );
    let kids = doc.children(doc.root());
    let first = tree.bounds(tree.rendered(kids[0]).unwrap()).unwrap();
    let second = tree.bounds(tree.rendered(kids[1]).unwrap()).unwrap();
    let (x, _) = first.anchor_point(Anchor::Right);
    assert!(x <= second.x);
}

#[test]
fn layout_reflects_preview_insertion() {
    let doc = Document::new(&ElementData::new("gds-flex").with_attr("flex-direction", "column"));
    let mut tree = RenderTree::new();
    let root = tree.render(&doc, None).unwrap();
    let preview = tree
        .insert_preview(root, None, Some(&ElementData::new("gds-button").with_text("Ghost")), "opacity: 0.5;")
        .unwrap();
    resolve_layout(&mut tree, Viewport::default());
    assert!(tree.bounds(preview).is_some());
    assert_eq!(tree.hit_test(10.0, 10.0), Some(doc.root()));
}
