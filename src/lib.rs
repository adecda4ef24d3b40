//! # elementgrad
//!
//! Reverse-mode automatic differentiation over scalar values, with a small
//! multilayer perceptron, a mean-squared-error loss and a gradient-descent
//! trainer built on top of it.
//!
//! ```
//! use elementgrad::autograd::{Graph, ScalarNode};
//!
//! let g = Graph::new();
//! let x = g.leaf(2.0);
//! let y = x * x + 3.0 * x;
//! y.backward().unwrap();
//! assert_eq!(y.data(), 10.0);
//! assert_eq!(x.grad(), 7.0);
//! ```

pub mod autograd;
pub mod config;
pub mod data;
pub mod loss;
pub mod nn;
pub mod optim;
pub mod viz;

use log::info;
use thiserror::Error;

use autograd::{Graph, ScalarNode};
use config::{Config, ConfigError};
use data::DataError;
use nn::{Mlp, Module, NnError};
use optim::{GradientDescent, TrainError, TrainReport};

/// Errors from an end-to-end [`run`].
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Model(#[from] NnError),

    #[error(transparent)]
    Train(#[from] TrainError),
}

/// One evaluated example after training.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    pub input: Vec<f64>,
    pub target: f64,
    pub output: f64,
}

/// Result of a [`run`]: the loss history and the trained model's predictions.
#[derive(Clone, Debug, PartialEq)]
pub struct RunOutcome {
    pub report: TrainReport,
    pub predictions: Vec<Prediction>,
}

/// Validates `config`, trains an [`Mlp`] on a synthetic `y = 2 * mean(x)` dataset
/// and evaluates it on the training inputs.
pub fn run(config: &Config) -> Result<RunOutcome, RunError> {
    config.validate()?;
    let dataset = data::linear(config.dataset_size, config.input_width, config.seed)?;
    info!("num examples: {}", dataset.len());

    let graph = Graph::new();
    let model = Mlp::seeded(
        &graph,
        config.input_width,
        &config.layer_widths,
        config.activation,
        config.seed,
    )?;
    info!("num params: {}", model.parameters().len());

    let optimizer = GradientDescent::new(config.epochs, config.learning_rate)
        .with_log_every(config.log_every);
    let report = optimizer.fit(&graph, &model, &dataset.xs, &dataset.ys)?;

    let mark = graph.len();
    let mut predictions = Vec::with_capacity(dataset.len());
    for (x, &target) in dataset.xs.iter().zip(&dataset.ys) {
        let output = model.forward_values(&graph, x)?[0].data();
        predictions.push(Prediction {
            input: x.clone(),
            target,
            output,
        });
        graph.truncate(mark);
    }
    Ok(RunOutcome {
        report,
        predictions,
    })
}
