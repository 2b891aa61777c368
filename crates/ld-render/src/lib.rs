pub mod bounds;
pub mod layout;
pub mod tree;

pub use bounds::{Anchor, Bounds};
pub use layout::{Viewport, resolve_layout};
pub use tree::{HIGHLIGHT_CLASS, PLACEHOLDER_STYLE, RenderId, RenderSnapshot, RenderTree, RenderedElement};
