pub mod data;
pub mod emitter;
pub mod error;
pub mod kind;
pub mod model;
pub mod tag;

pub use data::{Attributes, DropPayload, ElementData, PREVIEW_ATTR, PREVIEW_VALUE};
pub use emitter::emit_markup;
pub use error::TreeError;
pub use kind::{ElementKind, FlexDirection, PropertyField, PropertyInput, PropertyTarget};
pub use model::*;
pub use tag::Tag;

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
