//! Neurons, layers and multilayer perceptrons built from autograd leaves.
//!
//! Parameters are leaves created once in a [`Graph`](crate::autograd::Graph)
//! and kept by id; every forward pass appends a fresh expression on top of
//! them. Initial values are sampled uniformly from `[-1, 1]`.

mod activation;
mod error;
mod layer;
mod mlp;
mod neuron;

pub use activation::{Activation, ParseActivationError};
pub use error::NnError;
pub use layer::Layer;
pub use mlp::Mlp;
pub use neuron::Neuron;

use crate::autograd::{Graph, NodeId, Var};

/// A differentiable model: maps input nodes to output nodes and exposes its parameters.
pub trait Module {
    /// Expected input width.
    fn nin(&self) -> usize;

    /// Builds the forward expression for one example.
    ///
    /// Fails with [`NnError::InputWidthMismatch`] before building anything if
    /// `x.len()` differs from [`Module::nin`].
    fn forward<'g>(&self, graph: &'g Graph, x: &[Var<'g>]) -> Result<Vec<Var<'g>>, NnError>;

    /// All parameter leaves, in a stable order.
    fn parameters(&self) -> Vec<NodeId>;

    /// Lifts raw inputs to constant leaves and runs [`Module::forward`].
    fn forward_values<'g>(&self, graph: &'g Graph, x: &[f64]) -> Result<Vec<Var<'g>>, NnError> {
        check_width(self.nin(), x.len())?;
        let inputs: Vec<Var<'g>> = x.iter().map(|&v| graph.var(graph.constant(v))).collect();
        self.forward(graph, &inputs)
    }
}

pub(crate) fn check_width(expected: usize, actual: usize) -> Result<(), NnError> {
    if expected == actual {
        Ok(())
    } else {
        Err(NnError::InputWidthMismatch { expected, actual })
    }
}
