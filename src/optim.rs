//! Full-batch gradient descent over a model's parameter leaves.

use log::{debug, info};
use thiserror::Error;

use crate::autograd::{Graph, GraphError, NodeId, ScalarNode};
use crate::loss::{mse, LossError};
use crate::nn::{Module, NnError};

/// Default number of epochs between two loss log lines.
pub const DEFAULT_LOG_EVERY: usize = 20;

/// Errors produced by [`GradientDescent::fit`].
#[derive(Error, Debug)]
pub enum TrainError {
    #[error("model: {0}")]
    Model(#[from] NnError),

    #[error("loss: {0}")]
    Loss(#[from] LossError),

    #[error("graph: {0}")]
    Graph(#[from] GraphError),

    /// The loss compares one scalar per example.
    #[error("model produces {actual} outputs per example, expected 1")]
    OutputWidth { actual: usize },
}

/// Loss history of a training run, one entry per epoch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainReport {
    pub losses: Vec<f64>,
}

impl TrainReport {
    #[must_use]
    pub fn first_loss(&self) -> Option<f64> {
        self.losses.first().copied()
    }

    #[must_use]
    pub fn final_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }
}

/// Plain gradient descent: `data -= learning_rate * grad`, then `grad = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct GradientDescent {
    epochs: usize,
    learning_rate: f64,
    log_every: usize,
}

impl GradientDescent {
    #[must_use]
    pub fn new(epochs: usize, learning_rate: f64) -> Self {
        Self {
            epochs,
            learning_rate,
            log_every: DEFAULT_LOG_EVERY,
        }
    }

    /// Logs the loss every `log_every` epochs (0 logs only the final epoch).
    #[must_use]
    pub fn with_log_every(mut self, log_every: usize) -> Self {
        self.log_every = log_every;
        self
    }

    #[must_use]
    pub fn epochs(&self) -> usize {
        self.epochs
    }

    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Applies one update to every parameter and resets its gradient.
    pub fn step(&self, graph: &Graph, params: &[NodeId]) -> Result<(), GraphError> {
        for &p in params {
            let updated = graph.data(p) - self.learning_rate * graph.grad(p);
            graph.set_data(p, updated)?;
            graph.zero_grad(p)?;
        }
        Ok(())
    }

    /// Trains `model` on `(xs[i], ys[i])` pairs with mean squared error.
    ///
    /// Each epoch builds the loss over the whole dataset, runs one backward
    /// pass, updates the parameters and drops the epoch's expression nodes
    /// (also when the epoch fails).
    /// The recorded loss of an epoch is the one computed before its update.
    pub fn fit<M: Module>(
        &self,
        graph: &Graph,
        model: &M,
        xs: &[Vec<f64>],
        ys: &[f64],
    ) -> Result<TrainReport, TrainError> {
        let params = model.parameters();
        let mark = graph.len();
        let mut report = TrainReport {
            losses: Vec::with_capacity(self.epochs),
        };

        for epoch in 0..self.epochs {
            let result = self.epoch(graph, model, &params, xs, ys);
            debug!("epoch {}: {} graph nodes", epoch + 1, graph.len());
            graph.truncate(mark);
            let loss_val = result?;
            report.losses.push(loss_val);

            let last = epoch + 1 == self.epochs;
            if last || (self.log_every > 0 && epoch % self.log_every == 0) {
                info!("Epoch {}: {:.4}", epoch + 1, loss_val);
            }
        }
        Ok(report)
    }

    /// Forward over the dataset, one backward pass, one update. Returns the loss.
    fn epoch<M: Module>(
        &self,
        graph: &Graph,
        model: &M,
        params: &[NodeId],
        xs: &[Vec<f64>],
        ys: &[f64],
    ) -> Result<f64, TrainError> {
        let mut predictions = Vec::with_capacity(xs.len());
        for x in xs {
            let out = model.forward_values(graph, x)?;
            match out.as_slice() {
                [single] => predictions.push(*single),
                _ => return Err(TrainError::OutputWidth { actual: out.len() }),
            }
        }
        let loss = mse(ys, &predictions)?;
        loss.backward()?;
        self.step(graph, params)?;
        Ok(loss.data())
    }
}
