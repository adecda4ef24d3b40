use rand::Rng;
use rand_distr::{Distribution, Uniform};

use super::{check_width, Activation, Module, NnError};
use crate::autograd::{Graph, NodeId, Var};

/// Lower and upper bound of the initial parameter distribution.
const INIT_RANGE: (f64, f64) = (-1.0, 1.0);

pub(crate) fn init_distribution() -> Result<Uniform<f64>, NnError> {
    Ok(Uniform::new_inclusive(INIT_RANGE.0, INIT_RANGE.1)?)
}

/// A single unit: `activation(b + Σ w_i * x_i)`.
#[derive(Clone, Debug)]
pub struct Neuron {
    weights: Vec<NodeId>,
    bias: NodeId,
    activation: Activation,
    layer_no: usize,
    neuron_no: usize,
}

impl Neuron {
    /// Creates a neuron with `nin` weights and a bias, all sampled from `[-1, 1]`.
    ///
    /// Parameters are named `w[layer,neuron,i]` and `b[layer,neuron]`.
    pub fn new<R: Rng + ?Sized>(
        graph: &Graph,
        nin: usize,
        activation: Activation,
        layer_no: usize,
        neuron_no: usize,
        rng: &mut R,
    ) -> Result<Self, NnError> {
        if nin == 0 {
            return Err(NnError::ZeroWidth { position: layer_no });
        }
        let dist = init_distribution()?;
        let weights = (0..nin)
            .map(|i| {
                graph
                    .leaf_named(dist.sample(rng), format!("w[{layer_no},{neuron_no},{i}]"))
                    .id()
            })
            .collect();
        let bias = graph
            .leaf_named(dist.sample(rng), format!("b[{layer_no},{neuron_no}]"))
            .id();
        Ok(Self {
            weights,
            bias,
            activation,
            layer_no,
            neuron_no,
        })
    }

    /// Creates a neuron with fixed parameter values (layer 0, neuron 0).
    pub fn from_parameters(graph: &Graph, weights: &[f64], bias: f64, activation: Activation) -> Self {
        let weights = weights
            .iter()
            .enumerate()
            .map(|(i, &w)| graph.leaf_named(w, format!("w[0,0,{i}]")).id())
            .collect();
        let bias = graph.leaf_named(bias, "b[0,0]").id();
        Self {
            weights,
            bias,
            activation,
            layer_no: 0,
            neuron_no: 0,
        }
    }

    #[must_use]
    pub fn weights(&self) -> &[NodeId] {
        &self.weights
    }

    #[must_use]
    pub fn bias(&self) -> NodeId {
        self.bias
    }

    #[must_use]
    pub fn activation(&self) -> Activation {
        self.activation
    }

    /// Forward pass producing this neuron's single output, named `Neuron[layer,neuron]`.
    pub fn output<'g>(&self, graph: &'g Graph, x: &[Var<'g>]) -> Result<Var<'g>, NnError> {
        check_width(self.weights.len(), x.len())?;
        let sum = self
            .weights
            .iter()
            .zip(x)
            .fold(graph.var(self.bias), |acc, (&w, &xi)| acc + graph.var(w) * xi);
        let out = self.activation.apply(sum);
        if out.id() != self.bias {
            graph.set_name(out.id(), format!("Neuron[{},{}]", self.layer_no, self.neuron_no))?;
        }
        Ok(out)
    }
}

impl Module for Neuron {
    fn nin(&self) -> usize {
        self.weights.len()
    }

    fn forward<'g>(&self, graph: &'g Graph, x: &[Var<'g>]) -> Result<Vec<Var<'g>>, NnError> {
        Ok(vec![self.output(graph, x)?])
    }

    /// Weights in input order, then the bias.
    fn parameters(&self) -> Vec<NodeId> {
        let mut params = self.weights.clone();
        params.push(self.bias);
        params
    }
}
