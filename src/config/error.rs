//! Configuration errors.

use thiserror::Error;

/// Errors produced when building or validating configuration.
///
/// # Variants
///
/// - **Validation**: values are inconsistent or out of range (e.g. an empty layer list).
///   *Recovery*: fix the values so that `validate()` passes.
/// - **EnvVar**: an environment variable could not be read (e.g. invalid Unicode).
/// - **Parse**: an environment variable was set but does not parse into the expected type
///   (e.g. `ELEMENTGRAD_EPOCHS=abc`). *Recovery*: set a valid value or unset it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("config validation: {0}")]
    Validation(String),

    #[error("env var {key}: {message}")]
    EnvVar { key: String, message: String },

    #[error("env var {key}={value:?}: {message}")]
    Parse {
        key: String,
        value: String,
        message: String,
    },
}

impl ConfigError {
    /// Returns a short message suitable for logging or user display.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ConfigError::Validation(m) => m,
            ConfigError::EnvVar { message, .. } | ConfigError::Parse { message, .. } => message,
        }
    }
}
