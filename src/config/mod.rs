//! Configuration for the model, the optimizer and the synthetic dataset.
//!
//! Load from environment via [`from_env`] and validate with [`Config::validate`].
//! Default values and env key names are centralized in the `constants` submodule.

mod builder;
mod constants;
mod error;

use constants::{
    DEFAULT_DATASET_SIZE, DEFAULT_EPOCHS, DEFAULT_INPUT_WIDTH, DEFAULT_LAYER_WIDTHS,
    DEFAULT_LEARNING_RATE, DEFAULT_LOG_EVERY, DEFAULT_SEED,
};

pub use builder::{env_key, env_parsed, env_string, from_env, parse_widths};
pub use error::ConfigError;

use crate::nn::Activation;

/// Central configuration for a training run.
///
/// Consumed once, when the model and optimizer are constructed.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Seed for parameter initialization and dataset sampling.
    pub seed: u64,

    /// Number of inputs of the network.
    pub input_width: usize,
    /// Width of each layer; the last one must be 1 (one prediction per example).
    pub layer_widths: Vec<usize>,
    /// Activation used by every neuron.
    pub activation: Activation,

    /// Number of full-batch gradient descent epochs.
    pub epochs: usize,
    pub learning_rate: f64,
    /// Log the loss every this many epochs (and at the last one).
    pub log_every: usize,

    /// Number of synthetic examples.
    pub dataset_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            input_width: DEFAULT_INPUT_WIDTH,
            layer_widths: DEFAULT_LAYER_WIDTHS.to_vec(),
            activation: Activation::default(),
            epochs: DEFAULT_EPOCHS,
            learning_rate: DEFAULT_LEARNING_RATE,
            log_every: DEFAULT_LOG_EVERY,
            dataset_size: DEFAULT_DATASET_SIZE,
        }
    }
}

impl Config {
    /// Validates configuration. Returns `Ok(())` if valid, or a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_width == 0 {
            return Err(ConfigError::Validation(
                "input_width must be greater than 0".to_string(),
            ));
        }
        if self.layer_widths.is_empty() {
            return Err(ConfigError::Validation(
                "layer_widths must name at least one layer".to_string(),
            ));
        }
        if let Some(i) = self.layer_widths.iter().position(|&w| w == 0) {
            return Err(ConfigError::Validation(format!(
                "layer_widths[{i}] must be greater than 0"
            )));
        }
        if self.layer_widths.last() != Some(&1) {
            return Err(ConfigError::Validation(format!(
                "the last layer must have width 1, got {:?}",
                self.layer_widths
            )));
        }
        if self.epochs == 0 {
            return Err(ConfigError::Validation(
                "epochs must be greater than 0".to_string(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(ConfigError::Validation(format!(
                "learning_rate must be finite and positive, got {}",
                self.learning_rate
            )));
        }
        if self.dataset_size == 0 {
            return Err(ConfigError::Validation(
                "dataset_size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
