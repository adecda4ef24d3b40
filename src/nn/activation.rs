//! Neuron activation functions.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::autograd::Var;

/// Nonlinearity applied to a neuron's weighted sum.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Activation {
    #[default]
    Tanh,
    Sigmoid,
    Relu,
    /// No activation; the neuron is affine.
    Identity,
}

impl Activation {
    /// Applies the activation to `x`.
    #[must_use]
    pub fn apply<'g>(self, x: Var<'g>) -> Var<'g> {
        match self {
            Activation::Tanh => x.tanh(),
            Activation::Sigmoid => x.sigmoid(),
            Activation::Relu => x.relu(),
            Activation::Identity => x,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Activation::Tanh => "tanh",
            Activation::Sigmoid => "sigmoid",
            Activation::Relu => "relu",
            Activation::Identity => "identity",
        }
    }
}

impl fmt::Display for Activation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown activation name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown activation {0:?} (expected tanh, sigmoid, relu or identity)")]
pub struct ParseActivationError(pub String);

impl FromStr for Activation {
    type Err = ParseActivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tanh" => Ok(Activation::Tanh),
            "sigmoid" => Ok(Activation::Sigmoid),
            "relu" => Ok(Activation::Relu),
            "identity" | "linear" | "none" => Ok(Activation::Identity),
            _ => Err(ParseActivationError(s.to_string())),
        }
    }
}
