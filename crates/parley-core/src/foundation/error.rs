//! Unified error types for the Parley core.
//!
//! Runtime-level errors (registration, configuration) live in
//! `parley-runtime`; this module holds the errors produced by the engine
//! and the outbound messaging boundary.

use thiserror::Error;

// =============================================================================
// Outbound API Errors
// =============================================================================

/// Errors produced by outbound messaging calls.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The messenger has no usable connection.
    #[error("messenger is not connected")]
    NotConnected,

    /// The remote call timed out.
    #[error("API call timed out")]
    Timeout,

    /// The server rejected the request.
    #[error("API rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code of the rejection.
        status: u16,
        /// Response body or server-supplied message.
        message: String,
    },

    /// Request or response (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Transport-level failure (connection refused, DNS, broken pipe, ...).
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl ApiError {
    /// Whether a retry could plausibly succeed.
    ///
    /// Rejections are definitive; transport failures and timeouts are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::NotConnected | ApiError::Timeout | ApiError::Transport(_)
        )
    }
}

/// Result type for outbound API calls.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Extraction Errors
// =============================================================================

/// Errors raised while extracting handler parameters from a context.
///
/// An extraction failure skips the handler; it is not treated as a dispatch
/// error.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// The dispatched event does not match the requested type.
    #[error("event type mismatch: handler expects {expected}, got '{got}'")]
    EventTypeMismatch {
        /// The requested event type name.
        expected: &'static str,
        /// The dispatched event's name.
        got: String,
    },

    /// The context has no messenger attached.
    #[error("no messenger available in context")]
    MissingMessenger,

    /// The attached messenger is not of the requested concrete type.
    #[error("messenger type mismatch: handler expects {expected}")]
    MessengerTypeMismatch {
        /// The requested messenger type name.
        expected: &'static str,
    },

    /// The webhook payload did not match the expected shape.
    #[error("webhook payload for '{event}' did not deserialize: {reason}")]
    PayloadMismatch {
        /// The webhook event name.
        event: String,
        /// Deserialization failure detail.
        reason: String,
    },
}

/// Result type for parameter extraction.
pub type ExtractResult<T> = Result<T, ExtractError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_not_retryable() {
        let rejected = ApiError::Rejected {
            status: 403,
            message: "forbidden".into(),
        };
        assert!(!rejected.is_retryable());
        assert!(!ApiError::Serialization("bad".into()).is_retryable());

        assert!(ApiError::Timeout.is_retryable());
        assert!(ApiError::NotConnected.is_retryable());
        assert!(ApiError::Transport("reset".into()).is_retryable());
    }
}
