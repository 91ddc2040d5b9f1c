//! Structural mutation records
//!
//! Every change to the connected tree is journaled as a `Mutation`. The
//! journal replaces implicit observer callbacks: consumers drain one batch
//! per tick with [`DomTree::take_mutations`](crate::DomTree::take_mutations)
//! and react to it, which may in turn journal further batches. Mutations in
//! detached subtrees are not recorded.

use crate::NodeId;

/// Kind of structural change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    /// Nodes were appended to `parent`'s child list
    ChildrenAdded,
    /// Nodes were detached from `parent`'s child list
    ChildrenRemoved,
}

/// One recorded structural change
#[derive(Debug, Clone)]
pub struct Mutation {
    pub kind: MutationKind,
    /// Parent whose child list changed
    pub parent: NodeId,
    /// The added or removed child nodes, in operation order
    pub nodes: Vec<NodeId>,
}

impl Mutation {
    pub fn children_added(parent: NodeId, nodes: Vec<NodeId>) -> Self {
        Self {
            kind: MutationKind::ChildrenAdded,
            parent,
            nodes,
        }
    }

    pub fn children_removed(parent: NodeId, nodes: Vec<NodeId>) -> Self {
        Self {
            kind: MutationKind::ChildrenRemoved,
            parent,
            nodes,
        }
    }
}
