//! Build [`Config`] from environment variables.
//!
//! [`env_string`] and [`env_parsed`] read one key each; key names and defaults
//! live in the `constants` submodule.

use super::constants::{
    ENV_ACTIVATION, ENV_DATASET_SIZE, ENV_EPOCHS, ENV_INPUT_WIDTH, ENV_LAYER_WIDTHS,
    ENV_LEARNING_RATE, ENV_LOG_EVERY, ENV_PREFIX, ENV_SEED,
};
use super::{Config, ConfigError};
use crate::nn::Activation;

/// Returns the full environment variable key for a suffix (e.g. `SEED` → `ELEMENTGRAD_SEED`).
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Reads an environment variable as a string; `Ok(None)` if unset.
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(s) => Ok(Some(s)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::EnvVar {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

/// Reads an environment variable and parses it into `T`; `Ok(None)` if unset.
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let Some(s) = env_string(key)? else {
        return Ok(None);
    };
    s.trim().parse().map(Some).map_err(|e: T::Err| ConfigError::Parse {
        key: key.to_string(),
        value: s.clone(),
        message: e.to_string(),
    })
}

/// Parses a comma-separated list of layer widths such as `"4,4,1"`.
pub fn parse_widths(key: &str, value: &str) -> Result<Vec<usize>, ConfigError> {
    value
        .split(',')
        .map(|part| {
            part.trim().parse::<usize>().map_err(|e| ConfigError::Parse {
                key: key.to_string(),
                value: value.to_string(),
                message: e.to_string(),
            })
        })
        .collect()
}

/// Builds [`Config`] from environment variables, falling back to [`Config::default`] for unset values.
///
/// Returns [`ConfigError`] if any *set* variable fails to parse. The result is not validated.
pub fn from_env() -> Result<Config, ConfigError> {
    let default = Config::default();

    let seed = env_parsed::<u64>(&env_key(ENV_SEED))?.unwrap_or(default.seed);
    let input_width =
        env_parsed::<usize>(&env_key(ENV_INPUT_WIDTH))?.unwrap_or(default.input_width);
    let widths_key = env_key(ENV_LAYER_WIDTHS);
    let layer_widths = match env_string(&widths_key)? {
        Some(s) => parse_widths(&widths_key, &s)?,
        None => default.layer_widths,
    };
    let activation =
        env_parsed::<Activation>(&env_key(ENV_ACTIVATION))?.unwrap_or(default.activation);
    let epochs = env_parsed::<usize>(&env_key(ENV_EPOCHS))?.unwrap_or(default.epochs);
    let learning_rate =
        env_parsed::<f64>(&env_key(ENV_LEARNING_RATE))?.unwrap_or(default.learning_rate);
    let log_every = env_parsed::<usize>(&env_key(ENV_LOG_EVERY))?.unwrap_or(default.log_every);
    let dataset_size =
        env_parsed::<usize>(&env_key(ENV_DATASET_SIZE))?.unwrap_or(default.dataset_size);

    Ok(Config {
        seed,
        input_width,
        layer_widths,
        activation,
        epochs,
        learning_rate,
        log_every,
        dataset_size,
    })
}
