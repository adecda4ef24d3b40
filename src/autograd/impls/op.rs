//! Operation tags: which primitive produced a node, and from which operands.

use super::graph::NodeId;

/// The primitive that produced a node, carrying its operand ids.
///
/// Operands always refer to nodes appended before the node holding this tag,
/// which keeps the operand relation acyclic.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Op {
    /// Input, parameter or lifted constant; no operands.
    Leaf,
    Add(NodeId, NodeId),
    Sub(NodeId, NodeId),
    Mul(NodeId, NodeId),
    Div(NodeId, NodeId),
    /// Power by a constant exponent.
    Pow(NodeId, f64),
    Tanh(NodeId),
    Sigmoid(NodeId),
    Relu(NodeId),
    Exp(NodeId),
}

impl Op {
    /// Returns the `i`-th operand, or `None` past the last one.
    #[must_use]
    pub fn operand(&self, i: usize) -> Option<NodeId> {
        match (*self, i) {
            (Op::Leaf, _) => None,
            (Op::Add(a, _) | Op::Sub(a, _) | Op::Mul(a, _) | Op::Div(a, _), 0) => Some(a),
            (Op::Add(_, b) | Op::Sub(_, b) | Op::Mul(_, b) | Op::Div(_, b), 1) => Some(b),
            (
                Op::Pow(a, _) | Op::Tanh(a) | Op::Sigmoid(a) | Op::Relu(a) | Op::Exp(a),
                0,
            ) => Some(a),
            _ => None,
        }
    }

    /// Operands in order (empty for leaves).
    #[must_use]
    pub fn operands(&self) -> Vec<NodeId> {
        (0..2).map_while(|i| self.operand(i)).collect()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Op::Leaf)
    }

    /// Short symbol used in labels and DOT output; empty for leaves.
    #[must_use]
    pub fn symbol(&self) -> &'static str {
        match self {
            Op::Leaf => "",
            Op::Add(..) => "+",
            Op::Sub(..) => "-",
            Op::Mul(..) => "*",
            Op::Div(..) => "/",
            Op::Pow(..) => "**",
            Op::Tanh(_) => "tanh",
            Op::Sigmoid(_) => "sigmoid",
            Op::Relu(_) => "relu",
            Op::Exp(_) => "exp",
        }
    }

    /// Human-readable name of the primitive.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Op::Leaf => "leaf",
            Op::Add(..) => "add",
            Op::Sub(..) => "sub",
            Op::Mul(..) => "mul",
            Op::Div(..) => "div",
            Op::Pow(..) => "pow",
            Op::Tanh(_) => "tanh",
            Op::Sigmoid(_) => "sigmoid",
            Op::Relu(_) => "relu",
            Op::Exp(_) => "exp",
        }
    }
}
