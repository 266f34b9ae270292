//! Runtime error types.

use thiserror::Error;

/// Errors raised while wiring rules at startup.
///
/// Registration runs once before any event can be dispatched; these errors
/// are expected to fail process startup rather than be caught.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// A webhook rule was registered with an empty event name.
    #[error("webhook event name must not be empty")]
    EmptyEventName,

    /// A rule with the same identity was already registered.
    #[error("rule '{0}' is already registered")]
    DuplicateRule(String),
}

/// Errors that can occur during runtime operations.
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Rule registration failed.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Configuration loading failed.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The outbound messenger could not be constructed.
    #[error("failed to set up outbound messenger: {0}")]
    Messenger(#[from] parley_core::ApiError),
}

/// Result type for runtime operations.
pub type RuntimeResult<T> = Result<T, RuntimeError>;
