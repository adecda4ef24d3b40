//! Default values and environment variable key names used by the config builder.

/// Environment variable prefix (e.g. `ELEMENTGRAD_EPOCHS`).
pub(crate) const ENV_PREFIX: &str = "ELEMENTGRAD_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_SEED: &str = "SEED";
pub(crate) const ENV_INPUT_WIDTH: &str = "INPUT_WIDTH";
pub(crate) const ENV_LAYER_WIDTHS: &str = "LAYER_WIDTHS";
pub(crate) const ENV_ACTIVATION: &str = "ACTIVATION";
pub(crate) const ENV_EPOCHS: &str = "EPOCHS";
pub(crate) const ENV_LEARNING_RATE: &str = "LEARNING_RATE";
pub(crate) const ENV_LOG_EVERY: &str = "LOG_EVERY";
pub(crate) const ENV_DATASET_SIZE: &str = "DATASET_SIZE";

// --- Default values ---

pub(crate) const DEFAULT_SEED: u64 = 42;
pub(crate) const DEFAULT_INPUT_WIDTH: usize = 1;
pub(crate) const DEFAULT_LAYER_WIDTHS: &[usize] = &[4, 1];
pub(crate) const DEFAULT_EPOCHS: usize = 200;
pub(crate) const DEFAULT_LEARNING_RATE: f64 = 0.05;
pub(crate) const DEFAULT_LOG_EVERY: usize = 20;
pub(crate) const DEFAULT_DATASET_SIZE: usize = 16;
