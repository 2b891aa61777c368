//! Plain, serializable element records.
//!
//! `ElementData` is the wire form shared by persistence, history snapshots,
//! drag payloads, import/export and the AI endpoint. It carries no identity,
//! no parent links and no rendered-element references.

use crate::tag::Tag;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Insertion-ordered attribute map. Order is kept so exported markup and
/// JSON list attributes the way they were authored.
pub type Attributes = IndexMap<String, String>;

/// Attribute marking a transient preview element.
pub const PREVIEW_ATTR: &str = "data-preview";

/// Value of [`PREVIEW_ATTR`] on preview elements.
pub const PREVIEW_VALUE: &str = "true";

/// One element of a document, recursively.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ElementData {
    pub tag: Tag,

    #[serde(default)]
    pub attributes: Attributes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub children: Vec<ElementData>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: Tag::intern_or_default(tag),
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: ElementData) -> Self {
        self.children.push(child);
        self
    }

    /// True if this record carries the preview marker.
    pub fn is_preview(&self) -> bool {
        is_preview(&self.attributes)
    }

    /// Drop every preview-marked record from this subtree.
    pub fn strip_previews(&mut self) {
        self.children.retain(|c| !c.is_preview());
        for child in &mut self.children {
            child.strip_previews();
        }
    }

    /// Total number of records in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(ElementData::count).sum::<usize>()
    }

    /// Parse a JSON record.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Compact JSON form.
    pub fn to_json(&self) -> String {
        // Maps with string keys and plain strings cannot fail to serialize.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// True if the attribute map carries the preview marker.
pub fn is_preview(attributes: &Attributes) -> bool {
    attributes.get(PREVIEW_ATTR).is_some_and(|v| v == PREVIEW_VALUE)
}

/// A drag payload: an element fragment whose `tag` may be missing.
///
/// Payloads come from the platform drag channel and are untrusted; one
/// without a tag is inert.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DropPayload {
    #[serde(default)]
    pub tag: Option<String>,

    #[serde(default)]
    pub attributes: Attributes,

    #[serde(default)]
    pub text: Option<String>,

    #[serde(default)]
    pub children: Vec<ElementData>,
}

impl DropPayload {
    /// Parse a payload. Malformed JSON yields `None`.
    pub fn parse(json: &str) -> Option<Self> {
        if json.trim().is_empty() {
            return None;
        }
        match serde_json::from_str(json) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::debug!("ignoring malformed drop payload: {e}");
                None
            }
        }
    }

    /// Convert into an element record. Payloads without a (non-empty) tag
    /// yield `None`.
    pub fn into_element(self) -> Option<ElementData> {
        let tag = self.tag.filter(|t| !t.is_empty())?;
        Some(ElementData {
            tag: Tag::intern(&tag),
            attributes: self.attributes,
            text: self.text,
            children: self.children,
        })
    }
}
