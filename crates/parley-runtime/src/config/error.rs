//! Configuration error types.

use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source could not be read or the merged figure did not match the
    /// schema.
    #[error("configuration error: {0}")]
    Extract(#[from] figment::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
