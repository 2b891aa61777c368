//! Editor configuration.

use crate::history::DEFAULT_HISTORY_LIMIT;
use ld_core::ElementData;
use ld_render::Viewport;
use serde::{Deserialize, Serialize};

/// Inline style applied to drag previews.
pub const DEFAULT_PREVIEW_STYLE: &str = "opacity: 0.5;";

/// Root of a fresh document: an empty column flex container.
pub fn default_root() -> ElementData {
    ElementData::new("gds-flex")
        .with_attr("padding", "m")
        .with_attr("gap", "m")
        .with_attr("flex-direction", "column")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Maximum number of history entries kept.
    pub history_limit: usize,
    /// Document an editor starts with.
    pub default_root: ElementData,
    /// Size used by the headless layout when no host measures elements.
    pub viewport: Viewport,
    pub preview_style: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_root: default_root(),
            viewport: Viewport::default(),
            preview_style: DEFAULT_PREVIEW_STYLE.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
