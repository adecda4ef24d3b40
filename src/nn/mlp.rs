use rand::{rngs::StdRng, Rng, SeedableRng};

use super::{check_width, Activation, Layer, Module, NnError};
use crate::autograd::{Graph, NodeId, Var};

/// Multilayer perceptron: layers of widths `nouts` applied in sequence.
///
/// Every layer uses the same activation, including the last one.
#[derive(Clone, Debug)]
pub struct Mlp {
    layers: Vec<Layer>,
}

impl Mlp {
    /// Builds a network with input width `nin` and one layer per entry of `nouts`.
    pub fn new<R: Rng + ?Sized>(
        graph: &Graph,
        nin: usize,
        nouts: &[usize],
        activation: Activation,
        rng: &mut R,
    ) -> Result<Self, NnError> {
        if nouts.is_empty() {
            return Err(NnError::NoLayers);
        }
        if nin == 0 {
            return Err(NnError::ZeroWidth { position: 0 });
        }
        let sizes: Vec<usize> = std::iter::once(nin).chain(nouts.iter().copied()).collect();
        let layers = sizes
            .windows(2)
            .enumerate()
            .map(|(layer_no, w)| Layer::new(graph, w[0], w[1], activation, layer_no, rng))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { layers })
    }

    /// Same as [`Mlp::new`] with a `StdRng` seeded from `seed`.
    pub fn seeded(
        graph: &Graph,
        nin: usize,
        nouts: &[usize],
        activation: Activation,
        seed: u64,
    ) -> Result<Self, NnError> {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::new(graph, nin, nouts, activation, &mut rng)
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Width of the final layer.
    #[must_use]
    pub fn nout(&self) -> usize {
        self.layers.last().map_or(0, Layer::nout)
    }
}

impl Module for Mlp {
    fn nin(&self) -> usize {
        self.layers.first().map_or(0, Module::nin)
    }

    fn forward<'g>(&self, graph: &'g Graph, x: &[Var<'g>]) -> Result<Vec<Var<'g>>, NnError> {
        check_width(self.nin(), x.len())?;
        let mut activations = x.to_vec();
        for layer in &self.layers {
            activations = layer.forward(graph, &activations)?;
        }
        Ok(activations)
    }

    /// Layer by layer, neuron by neuron: weights then bias.
    fn parameters(&self) -> Vec<NodeId> {
        self.layers.iter().flat_map(Module::parameters).collect()
    }
}
