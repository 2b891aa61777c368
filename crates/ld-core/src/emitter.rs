//! Emitter: ElementData → markup.
//!
//! Produces `<tag key="value">text children</tag>` recursively, with
//! attributes in authored order.

use crate::data::ElementData;

/// Emit an element tree as markup.
#[must_use]
pub fn emit_markup(data: &ElementData) -> String {
    let mut out = String::with_capacity(256);
    emit_element(&mut out, data);
    out
}

fn emit_element(out: &mut String, data: &ElementData) {
    let tag = data.tag.as_str();
    out.push('<');
    out.push_str(tag);
    for (key, value) in &data.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        escape_into(out, value, true);
        out.push('"');
    }
    out.push('>');
    if let Some(text) = &data.text {
        escape_into(out, text, false);
    }
    for child in &data.children {
        emit_element(out, child);
    }
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn escape_into(out: &mut String, s: &str, attribute: bool) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}
