//! Error types for scene operations.

use thiserror::Error;

use crate::node::NodeId;

/// Errors produced by structural scene operations.
///
/// Most element and focus operations never fail: called on an id that is
/// not an element they do nothing. Errors are kept for operations whose
/// misuse would corrupt the tree.
#[derive(Error, Debug)]
pub enum SceneError {
    /// The node does not exist, or was destroyed.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Inserting the node would make it its own ancestor.
    #[error("cannot insert {child:?} into {parent:?}: circular reference")]
    CircularReference {
        /// The node that would receive the child.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
    },

    /// The node exists but has no tile buffer.
    #[error("node is not a surface: {0:?}")]
    NotASurface(NodeId),

    /// The tile buffer of a surface failed.
    #[error(transparent)]
    Buffer(#[from] tessera_buffer::BufferError),
}

/// Result type alias for scene operations.
pub type SceneResult<T> = std::result::Result<T, SceneError>;
