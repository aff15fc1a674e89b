//! Error types for tree operations.

/// Errors that can occur during tree operations.
///
/// Lookup misses are recoverable: the caller decides the fallback. Structural
/// invariant violations (cycles, double-parenting) are not represented here;
/// they panic at the offending call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// No child with the requested name exists.
    #[error("no child named '{0}'")]
    NotFound(String),

    /// A child index was past the end of the child list.
    #[error("child index {index} out of range for {len} children")]
    IndexOutOfRange { index: usize, len: usize },

    /// An explicit unique name collides with an existing sibling.
    #[error("a sibling with unique name '{0}' already exists")]
    NameConflict(String),

    /// The node handle is invalid or the node has been destroyed.
    #[error("invalid or destroyed node handle")]
    StaleNode,
}

/// Result type for tree operations.
pub type TreeResult<T> = std::result::Result<T, TreeError>;
