//! Errors raised by the backward engine.

use thiserror::Error;

use super::NodeId;

/// Invariant violations detected while traversing or mutating a [`Graph`](super::Graph).
///
/// None of these are recoverable conditions: they point at a construction bug
/// (a stale handle, a value update on a computed node, a cyclic operand link).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    /// The id does not address a live node of this graph (e.g. it was truncated away).
    #[error("node {node} is stale or not part of this graph (graph holds {len} nodes)")]
    UnknownNode { node: NodeId, len: usize },

    /// A node was reached again while it was still on the traversal stack.
    #[error("cycle detected at node {node} during topological traversal")]
    CycleDetected { node: NodeId },

    /// Only leaves may have their value replaced; computed values are immutable.
    #[error("node {node} is computed by {op}; only leaf values can be updated")]
    NotALeaf { node: NodeId, op: &'static str },
}
