//! Gradient checking against centered finite differences.
//!
//! The expression under test is rebuilt in a fresh [`Graph`] for every probe,
//! so the closure must depend only on the leaves it is handed.

use thiserror::Error;

use super::{Graph, GraphError, ScalarNode, Var};

/// Default probe step for [`check_gradients`].
pub const DEFAULT_EPSILON: f64 = 1e-6;
/// Default tolerance for [`check_gradients`].
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Failures reported by [`check_gradients`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GradCheckError {
    #[error("gradient mismatch for input {input_index}: analytical {analytical} vs numerical {numerical} (difference {difference})")]
    GradientMismatch {
        input_index: usize,
        analytical: f64,
        numerical: f64,
        difference: f64,
    },

    #[error("numerical gradient for input {input_index} is not finite (f+ = {plus}, f- = {minus})")]
    NumericalNotFinite {
        input_index: usize,
        plus: f64,
        minus: f64,
    },

    #[error("backward pass failed during gradient check: {0}")]
    Backward(#[from] GraphError),
}

/// Compares the gradients from [`Graph::backward`] with centered differences.
///
/// `f` receives one leaf per entry of `inputs` and returns the scalar output.
/// A pair passes when `|analytical - numerical| <= tolerance * (1 + |numerical|)`.
/// Returns the analytical gradients on success.
pub fn check_gradients<F>(
    inputs: &[f64],
    f: F,
    epsilon: f64,
    tolerance: f64,
) -> Result<Vec<f64>, GradCheckError>
where
    F: for<'g> Fn(&'g Graph, &[Var<'g>]) -> Var<'g>,
{
    let analytical = {
        let graph = Graph::new();
        let leaves: Vec<Var<'_>> = inputs.iter().map(|&x| graph.leaf(x)).collect();
        let out = f(&graph, &leaves);
        out.backward()?;
        let grads: Vec<f64> = leaves.iter().map(ScalarNode::grad).collect();
        grads
    };

    let eval = |probe: &[f64]| -> f64 {
        let graph = Graph::new();
        let leaves: Vec<Var<'_>> = probe.iter().map(|&x| graph.leaf(x)).collect();
        f(&graph, &leaves).data()
    };

    let mut probe = inputs.to_vec();
    for (input_index, &a) in analytical.iter().enumerate() {
        let x = inputs[input_index];
        probe[input_index] = x + epsilon;
        let plus = eval(&probe);
        probe[input_index] = x - epsilon;
        let minus = eval(&probe);
        probe[input_index] = x;

        let numerical = (plus - minus) / (2.0 * epsilon);
        if !numerical.is_finite() {
            return Err(GradCheckError::NumericalNotFinite {
                input_index,
                plus,
                minus,
            });
        }
        let difference = (a - numerical).abs();
        if !(difference <= tolerance * (1.0 + numerical.abs())) {
            return Err(GradCheckError::GradientMismatch {
                input_index,
                analytical: a,
                numerical,
                difference,
            });
        }
    }
    Ok(analytical)
}
