//! Configuration errors.

use thiserror::Error;

/// An environment variable held an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number of seconds, got '{value}'")]
    InvalidNumber { var: String, value: String },

    #[error("{var} must be greater than zero")]
    ZeroDuration { var: String },

    #[error("{var} must be an http(s) URL, got '{value}'")]
    InvalidUrl { var: String, value: String },
}
