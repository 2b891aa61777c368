use petgraph::graph::NodeIndex;
use thiserror::Error;

/// Structural errors from tree mutations.
///
/// These indicate a caller bug (a stale handle, an index past the end),
/// not bad user input: untrusted input is validated before it reaches the
/// tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node {0:?} is not part of the document")]
    UnknownNode(NodeIndex),

    #[error("insertion index {index} is out of bounds for {len} children")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("the root element cannot be moved or removed")]
    Root,

    #[error("node {0:?} already has a parent")]
    AlreadyAttached(NodeIndex),

    #[error("node {child:?} cannot be attached inside its own subtree")]
    Cycle { child: NodeIndex },
}
