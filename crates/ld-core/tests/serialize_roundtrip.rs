//! Integration tests: factory → document → serialize roundtrip (ld-core).
//!
//! Building a document from element data and serializing it back must be
//! lossless for tag, attributes, text and child order at any depth.

use ld_core::{Document, ElementData, ElementKind, emit_markup};
use pretty_assertions::assert_eq;

fn sample() -> ElementData {
    ElementData::new("gds-flex")
        .with_attr("padding", "m")
        .with_attr("gap", "m")
        .with_attr("flex-direction", "column")
        .with_child(
            ElementData::new("gds-card").with_child(
                ElementData::new("gds-flex")
                    .with_attr("flex-direction", "row")
                    .with_child(ElementData::new("gds-button").with_attr("rank", "primary").with_text("Save"))
                    .with_child(ElementData::new("gds-button").with_attr("rank", "tertiary").with_text("Cancel")),
            ),
        )
        .with_child(ElementData::new("gds-rich-text").with_text("# Title\n\nSome *markdown*."))
        .with_child(ElementData::new("gds-divider").with_attr("data-x", "1"))
}

fn nested(depth: usize) -> ElementData {
    let mut data = ElementData::new("gds-button").with_text("leaf");
    for i in 0..depth {
        data = ElementData::new("gds-flex")
            .with_attr("data-depth", &i.to_string())
            .with_child(ElementData::new("span").with_text(&format!("before {i}")))
            .with_child(data);
    }
    data
}

// ─── Roundtrip ──────────────────────────────────────────────────────────

#[test]
fn document_roundtrip_is_lossless() {
    let data = sample();
    let doc = Document::new(&data);
    assert_eq!(doc.to_data(), data);
    assert_eq!(doc.len(), data.count());
}

#[test]
fn deep_nesting_roundtrips() {
    for depth in [0, 1, 5, 40] {
        let data = nested(depth);
        assert_eq!(Document::new(&data).to_data(), data, "depth {depth}");
    }
}

#[test]
fn json_roundtrip_preserves_attribute_order() {
    let data = sample();
    let json = data.to_json();
    let back = ElementData::from_json(&json).unwrap();
    assert_eq!(back, data);
    assert_eq!(Document::new(&back).to_data().to_json(), json);
    let keys: Vec<_> = back.attributes.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["padding", "gap", "flex-direction"]);
}

#[test]
fn unknown_tags_pass_through() {
    let data = ElementData::new("my-widget").with_attr("foo", "bar");
    let doc = Document::new(&data);
    assert_eq!(doc.get(doc.root()).unwrap().kind, ElementKind::Generic);
    assert_eq!(doc.to_data(), data);
}

#[test]
fn parents_are_wired_at_every_level() {
    let doc = Document::new(&nested(6));
    for idx in doc.descendants(doc.root()) {
        for &child in doc.children(idx) {
            assert_eq!(doc.parent(child), Some(idx));
        }
    }
}

// ─── Markup ─────────────────────────────────────────────────────────────

#[test]
fn markup_follows_document_order() {
    let doc = Document::new(&sample());
    let markup = emit_markup(&doc.to_data());
    assert!(markup.starts_with(r#"<gds-flex padding="m" gap="m" flex-direction="column"><gds-card>"#));
    let save = markup.find("Save").unwrap();
    let cancel = markup.find("Cancel").unwrap();
    assert!(save < cancel);
    assert!(markup.ends_with(r#"<gds-divider data-x="1"></gds-divider></gds-flex>"#));
}
