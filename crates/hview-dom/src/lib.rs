//! hView DOM
//!
//! Memory-efficient DOM tree for the hView engine: an arena of nodes
//! addressed by `NodeId`, a journal of structural mutations consumed in
//! deterministic batches, and the relay binder that moves placeholder
//! content into its target element.

mod document;
mod mutations;
mod node;
mod relay;
mod tree;

pub use document::{Document, POPOVER_OPEN_STATE};
pub use mutations::{Mutation, MutationKind};
pub use node::{Attribute, ElementData, Node, NodeData, TextData};
pub use relay::{FOR_ATTR, PLACEHOLDER_TAG, RelayRegistry, is_placeholder};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Check that this ID refers to a node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }
}

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node not found")]
    NotFound,

    /// Operation requires an element node
    #[error("node is not an element")]
    NotAnElement,

    /// Hierarchy error (e.g., inserting a node into its own subtree)
    #[error("hierarchy request error")]
    HierarchyRequest,
}
