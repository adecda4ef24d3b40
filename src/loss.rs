//! Loss functions built from autograd primitives.

use thiserror::Error;

use crate::autograd::{Pow, Var};

/// Errors produced when assembling a loss expression.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LossError {
    #[error("loss needs at least one prediction")]
    Empty,

    #[error("{targets} targets for {predictions} predictions")]
    LengthMismatch { targets: usize, predictions: usize },
}

/// Mean squared error `Σ (pred_i - target_i)^2 / n` as a single root node.
///
/// Uses only sub, pow, add and div, so its gradient flows back into every prediction.
pub fn mse<'g>(targets: &[f64], predictions: &[Var<'g>]) -> Result<Var<'g>, LossError> {
    if targets.len() != predictions.len() {
        return Err(LossError::LengthMismatch {
            targets: targets.len(),
            predictions: predictions.len(),
        });
    }
    let n = predictions.len();
    let total = predictions
        .iter()
        .zip(targets)
        .map(|(&pred, &target)| (pred - target).pow(2.0))
        .reduce(|acc, term| acc + term)
        .ok_or(LossError::Empty)?;
    Ok(total / n as f64)
}
