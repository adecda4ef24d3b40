use rand::Rng;

use super::{check_width, Activation, Module, Neuron, NnError};
use crate::autograd::{Graph, NodeId, Var};

/// A row of `nout` neurons sharing the same `nin` inputs.
#[derive(Clone, Debug)]
pub struct Layer {
    nin: usize,
    neurons: Vec<Neuron>,
}

impl Layer {
    pub fn new<R: Rng + ?Sized>(
        graph: &Graph,
        nin: usize,
        nout: usize,
        activation: Activation,
        layer_no: usize,
        rng: &mut R,
    ) -> Result<Self, NnError> {
        if nout == 0 {
            return Err(NnError::ZeroWidth {
                position: layer_no + 1,
            });
        }
        let neurons = (0..nout)
            .map(|neuron_no| Neuron::new(graph, nin, activation, layer_no, neuron_no, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { nin, neurons })
    }

    #[must_use]
    pub fn nout(&self) -> usize {
        self.neurons.len()
    }

    #[must_use]
    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }
}

impl Module for Layer {
    fn nin(&self) -> usize {
        self.nin
    }

    fn forward<'g>(&self, graph: &'g Graph, x: &[Var<'g>]) -> Result<Vec<Var<'g>>, NnError> {
        check_width(self.nin, x.len())?;
        self.neurons.iter().map(|n| n.output(graph, x)).collect()
    }

    fn parameters(&self) -> Vec<NodeId> {
        self.neurons.iter().flat_map(Module::parameters).collect()
    }
}
