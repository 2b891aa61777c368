//! Element kinds and the tag → kind dispatch.
//!
//! `ElementKind::from_tag` is the only place a tag string is inspected.
//! Everything tag-specific (drop zones, empty-state placeholders, property
//! panels) hangs off the kind.

use crate::data::Attributes;
use crate::tag::Tag;
use serde::{Deserialize, Serialize};

/// Attribute holding a flex container's direction.
pub const FLEX_DIRECTION_ATTR: &str = "flex-direction";

/// The closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ElementKind {
    /// Pass-through element with no special behavior.
    #[default]
    Generic,
    /// Row/column flex container.
    Flex,
    /// Single-slot card wrapper.
    Card,
    /// Button with rank/variant/size properties.
    Button,
    /// Markdown rich text.
    RichText,
}

impl ElementKind {
    /// Map a tag to its kind. Unknown tags are `Generic`.
    pub fn from_tag(tag: Tag) -> Self {
        match tag.as_str() {
            "gds-flex" => ElementKind::Flex,
            "gds-card" => ElementKind::Card,
            "gds-button" => ElementKind::Button,
            "gds-rich-text" => ElementKind::RichText,
            _ => ElementKind::Generic,
        }
    }

    /// Containers accept dropped children and show an empty-state placeholder.
    pub fn is_container(self) -> bool {
        matches!(self, ElementKind::Flex | ElementKind::Card)
    }

    /// Text shown inside an empty container, or `None` for non-containers.
    pub fn placeholder_text(self, tag: Tag, attributes: &Attributes) -> Option<String> {
        match self {
            ElementKind::Flex => {
                let direction = attributes
                    .get(FLEX_DIRECTION_ATTR)
                    .map(String::as_str)
                    .filter(|d| !d.is_empty())
                    .unwrap_or(FlexDirection::Row.as_str());
                Some(format!("{tag} — {direction} — empty"))
            }
            ElementKind::Card => Some(format!("{tag} — empty")),
            _ => None,
        }
    }

    /// Editable properties a property panel offers for this kind.
    pub fn properties(self) -> &'static [PropertyField] {
        match self {
            ElementKind::Generic => &GENERIC_PROPERTIES,
            ElementKind::Flex => &FLEX_PROPERTIES,
            ElementKind::Card => &CARD_PROPERTIES,
            ElementKind::Button => &BUTTON_PROPERTIES,
            ElementKind::RichText => &RICH_TEXT_PROPERTIES,
        }
    }
}

/// Main axis of a flex container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

impl FlexDirection {
    /// Missing or `"row"` reads as a row; every other value lays out
    /// vertically.
    pub fn from_attributes(attributes: &Attributes) -> Self {
        match attributes.get(FLEX_DIRECTION_ATTR).map(String::as_str) {
            None | Some("row") => FlexDirection::Row,
            Some(_) => FlexDirection::Column,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FlexDirection::Row => "row",
            FlexDirection::Column => "column",
        }
    }
}

// ─── Property descriptors ────────────────────────────────────────────────

/// Where an edited property value is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "target", content = "key", rename_all = "camelCase")]
pub enum PropertyTarget {
    /// The element's text content.
    Text,
    /// A single attribute.
    Attribute(&'static str),
    /// The whole attribute map, edited as JSON.
    AttributesJson,
}

/// How a property is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "camelCase")]
pub enum PropertyInput {
    Line,
    Multiline,
    Markdown,
    Choice(&'static [&'static str]),
}

/// One editable property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PropertyField {
    pub label: &'static str,
    pub target: PropertyTarget,
    pub input: PropertyInput,
    /// Value shown when the attribute is unset.
    pub default: Option<&'static str>,
}

const TEXT_FIELD: PropertyField = PropertyField {
    label: "Text content",
    target: PropertyTarget::Text,
    input: PropertyInput::Line,
    default: None,
};

const ID_FIELD: PropertyField = PropertyField {
    label: "Id",
    target: PropertyTarget::Attribute("id"),
    input: PropertyInput::Line,
    default: None,
};

const HYPERSCRIPT_FIELD: PropertyField = PropertyField {
    label: "Hyperscript",
    target: PropertyTarget::Attribute("_"),
    input: PropertyInput::Multiline,
    default: None,
};

const ATTRIBUTES_FIELD: PropertyField = PropertyField {
    label: "Attributes",
    target: PropertyTarget::AttributesJson,
    input: PropertyInput::Multiline,
    default: None,
};

static GENERIC_PROPERTIES: [PropertyField; 4] =
    [TEXT_FIELD, ID_FIELD, HYPERSCRIPT_FIELD, ATTRIBUTES_FIELD];

static FLEX_PROPERTIES: [PropertyField; 2] = [
    PropertyField {
        label: "Flex direction",
        target: PropertyTarget::Attribute(FLEX_DIRECTION_ATTR),
        input: PropertyInput::Choice(&["row", "column"]),
        default: Some("row"),
    },
    ATTRIBUTES_FIELD,
];

static CARD_PROPERTIES: [PropertyField; 2] = [ID_FIELD, ATTRIBUTES_FIELD];

static BUTTON_PROPERTIES: [PropertyField; 6] = [
    TEXT_FIELD,
    PropertyField {
        label: "Rank",
        target: PropertyTarget::Attribute("rank"),
        input: PropertyInput::Choice(&["primary", "secondary", "tertiary"]),
        default: Some("primary"),
    },
    PropertyField {
        label: "Variant",
        target: PropertyTarget::Attribute("variant"),
        input: PropertyInput::Choice(&["neutral", "positive", "negative"]),
        default: Some("neutral"),
    },
    PropertyField {
        label: "Size",
        target: PropertyTarget::Attribute("size"),
        input: PropertyInput::Choice(&["xs", "small", "medium", "large"]),
        default: Some("medium"),
    },
    ID_FIELD,
    HYPERSCRIPT_FIELD,
];

static RICH_TEXT_PROPERTIES: [PropertyField; 1] = [PropertyField {
    label: "Content (Markdown)",
    target: PropertyTarget::Text,
    input: PropertyInput::Markdown,
    default: None,
}];
