//! Configuration errors.

use thiserror::Error;

/// Errors produced when building or validating [`Config`](super::Config).
///
/// `Parse` and `EnvVar` come from [`from_env`](super::from_env) when a key is
/// set to something unusable; unset keys never fail. `Validation` comes from
/// [`Config::validate`](super::Config::validate) and names the rule that failed.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    /// Values are out of range or inconsistent with each other.
    #[error("config validation: {0}")]
    Validation(String),

    /// A variable is set but cannot be read (e.g. not valid Unicode).
    #[error("env var {key}: {message}")]
    EnvVar { key: String, message: String },

    /// A variable is set but does not parse into the expected type.
    #[error("env var {key}={value:?}: {message}")]
    Parse {
        key: String,
        value: String,
        message: String,
    },
}

impl ConfigError {
    /// Short message without the key prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            ConfigError::Validation(m) => m,
            ConfigError::EnvVar { message, .. } | ConfigError::Parse { message, .. } => message,
        }
    }
}
