//! `Var`: operator-friendly handle to a node of a [`Graph`].

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use super::graph::{Graph, NodeId};
use crate::autograd::{Exp, GraphError, Pow, ScalarNode};

/// Handle to a scalar node: the graph it lives in plus its id.
///
/// `Var` is `Copy`; combining handles appends nodes to the shared graph, and
/// `f64` literals on either side of an operator are lifted to constant leaves.
#[derive(Clone, Copy)]
pub struct Var<'g> {
    graph: &'g Graph,
    id: NodeId,
}

impl<'g> Var<'g> {
    pub(crate) fn new(graph: &'g Graph, id: NodeId) -> Self {
        Var { graph, id }
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn graph(&self) -> &'g Graph {
        self.graph
    }

    /// Diagnostic label of the underlying node.
    #[must_use]
    pub fn label(&self) -> String {
        self.graph.label(self.id)
    }

    /// Hyperbolic tangent. Local grad is `1 - tanh^2`.
    #[must_use]
    pub fn tanh(self) -> Var<'g> {
        self.wrap(self.graph.tanh(self.id))
    }

    /// Logistic sigmoid. Local grad is `s * (1 - s)`.
    #[must_use]
    pub fn sigmoid(self) -> Var<'g> {
        self.wrap(self.graph.sigmoid(self.id))
    }

    /// ReLU: `max(0, self)`. Local grad is 1 if the output is positive, else 0.
    #[must_use]
    pub fn relu(self) -> Var<'g> {
        self.wrap(self.graph.relu(self.id))
    }

    fn wrap(self, id: NodeId) -> Var<'g> {
        Var::new(self.graph, id)
    }

    fn lift(self, literal: f64) -> NodeId {
        self.graph.constant(literal)
    }

    fn same_graph(self, other: Var<'g>) {
        assert!(
            std::ptr::eq(self.graph, other.graph),
            "cannot combine nodes {} and {} from different graphs",
            self.id,
            other.id
        );
    }
}

impl fmt::Debug for Var<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Var")
            .field("id", &self.id)
            .field("data", &self.data())
            .field("grad", &self.grad())
            .finish()
    }
}

impl ScalarNode for Var<'_> {
    fn data(&self) -> f64 {
        self.graph.data(self.id)
    }

    fn grad(&self) -> f64 {
        self.graph.grad(self.id)
    }

    fn backward(&self) -> Result<(), GraphError> {
        self.graph.backward(self.id)
    }

    /// # Panics
    ///
    /// Panics if the handle outlived its node, like [`ScalarNode::data`].
    fn zero_grad(&self) {
        if let Err(err) = self.graph.zero_grad(self.id) {
            panic!("{err}");
        }
    }
}

// -----------------------------------------------------------------------------
// std::ops: x + y, x - y, x * y, x / y, -x, with f64 literals on either side
// -----------------------------------------------------------------------------

macro_rules! binary_op {
    ($trait:ident, $method:ident) => {
        impl<'g> $trait for Var<'g> {
            type Output = Var<'g>;

            fn $method(self, rhs: Var<'g>) -> Var<'g> {
                self.same_graph(rhs);
                self.wrap(self.graph.$method(self.id, rhs.id))
            }
        }

        impl<'g> $trait<f64> for Var<'g> {
            type Output = Var<'g>;

            fn $method(self, rhs: f64) -> Var<'g> {
                let rhs = self.lift(rhs);
                self.wrap(self.graph.$method(self.id, rhs))
            }
        }

        impl<'g> $trait<Var<'g>> for f64 {
            type Output = Var<'g>;

            fn $method(self, rhs: Var<'g>) -> Var<'g> {
                let lhs = rhs.lift(self);
                rhs.wrap(rhs.graph.$method(lhs, rhs.id))
            }
        }
    };
}

binary_op!(Add, add);
binary_op!(Sub, sub);
binary_op!(Mul, mul);
binary_op!(Div, div);

impl<'g> Neg for Var<'g> {
    type Output = Var<'g>;

    fn neg(self) -> Var<'g> {
        self.wrap(self.graph.neg(self.id))
    }
}

impl<'g> Pow<f64> for Var<'g> {
    type Output = Var<'g>;

    fn pow(self, exp: f64) -> Var<'g> {
        self.wrap(self.graph.powf(self.id, exp))
    }
}

impl<'g> Exp for Var<'g> {
    type Output = Var<'g>;

    fn exp(self) -> Var<'g> {
        self.wrap(self.graph.exp(self.id))
    }
}
