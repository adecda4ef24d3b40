//! Errors produced when building or evaluating models.

use thiserror::Error;

use crate::autograd::GraphError;

/// Errors produced by the `nn` module.
///
/// # Variants
///
/// - **InputWidthMismatch**: the input vector length differs from the model's input width.
///   *When*: at the start of a forward pass, before any node is appended.
/// - **NoLayers** / **ZeroWidth**: the requested architecture is empty or has a zero-sized entry.
///   *When*: at construction.
/// - **Init**: the parameter distribution could not be built.
/// - **Graph**: a graph invariant was violated while naming or reading nodes.
#[derive(Error, Debug)]
pub enum NnError {
    #[error("input width mismatch: expected {expected}, got {actual}")]
    InputWidthMismatch { expected: usize, actual: usize },

    #[error("a network needs at least one layer")]
    NoLayers,

    /// Entry `position` of `[nin, nouts...]` is zero.
    #[error("architecture entry {position} is zero (entry 0 is the input width)")]
    ZeroWidth { position: usize },

    #[error("parameter initialization: {0}")]
    Init(#[from] rand_distr::uniform::Error),

    #[error(transparent)]
    Graph(#[from] GraphError),
}
