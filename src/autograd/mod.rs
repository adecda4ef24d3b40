//! Autograd: scalar computation graph with reverse-mode differentiation.
//!
//! Nodes live in a [`Graph`] arena and refer to their operands by [`NodeId`].
//! Every primitive eagerly computes its forward value and appends one node
//! tagged with an [`Op`]; [`Graph::backward`] walks the nodes reachable from a
//! root in topological order and applies the chain rule in reverse.
//!
//! [`Var`] is a copyable handle pairing a graph with a node id, so expressions
//! can be written with ordinary operators (`x * w + b`, `2.0 - x`, ...).

mod error;
pub mod grad_check;
pub mod impls;
#[cfg(test)]
mod tests;

pub use error::GraphError;
pub use impls::graph::{Graph, Node, NodeId};
pub use impls::op::Op;
pub use impls::var::Var;

/// Trait for raising a node to a constant power (e.g. `x.pow(2.0)`).
pub trait Pow<Rhs> {
    /// Result of the power operation.
    type Output;

    /// Returns `self^exp` with gradient tracking.
    #[must_use]
    fn pow(self, exp: Rhs) -> Self::Output;
}

/// Trait for the exponential of a node (e.g. `x.exp()`).
pub trait Exp {
    /// Result of the exponential.
    type Output;

    /// Returns `exp(self)` with gradient tracking.
    #[must_use]
    fn exp(self) -> Self::Output;
}

/// A differentiable scalar node in the computation graph.
///
/// Use [`ScalarNode::data`] for the forward value and [`ScalarNode::grad`]
/// after [`ScalarNode::backward`].
pub trait ScalarNode: Copy {
    /// Returns the forward pass value.
    fn data(&self) -> f64;

    /// Returns the gradient of the backward root with respect to this node.
    fn grad(&self) -> f64;

    /// Runs backpropagation from this node to every node it depends on.
    fn backward(&self) -> Result<(), GraphError>;

    /// Zeros the gradient at this node (e.g. after an optimizer step).
    fn zero_grad(&self);
}
