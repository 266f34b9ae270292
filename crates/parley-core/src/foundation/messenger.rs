//! Outbound messenger trait and related types.
//!
//! This module defines the [`Messenger`] trait which represents the outbound
//! messaging side of the hosting framework: posting text into an existing
//! dialog. Concrete implementations (e.g. the HTTP client in
//! `parley-client`) provide the transport.

use std::any::Any;
use std::sync::Arc;

use async_trait::async_trait;

use crate::foundation::error::ApiResult;
use crate::foundation::event::DialogToken;

/// The outbound messaging interface injected into reactions.
///
/// Sending is not idempotent: calling [`send_text`](Messenger::send_text)
/// twice posts two messages.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Returns an identifier for this messenger instance (e.g. the API URL
    /// or a configured bot id), used for logging.
    fn id(&self) -> &str;

    /// Posts one text message into the target dialog.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`](crate::foundation::error::ApiError) if the
    /// remote call fails: invalid token, network failure, or server
    /// rejection.
    async fn send_text(&self, dialog_token: &DialogToken, text: &str) -> ApiResult<()>;

    /// Returns self as an `Arc<dyn Any>` for safe downcasting.
    ///
    /// Implementors should simply return `self`.
    fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A boxed Messenger trait object.
pub type BoxedMessenger = Arc<dyn Messenger>;

/// Attempts to downcast a [`BoxedMessenger`] to a concrete type.
///
/// Used by the extractor system so handlers can receive concrete messenger
/// types and reach transport-specific APIs.
pub fn downcast_messenger<T: Messenger + 'static>(messenger: BoxedMessenger) -> Option<Arc<T>> {
    let any_arc = messenger.as_any();
    Arc::downcast::<T>(any_arc).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullMessenger;

    #[async_trait]
    impl Messenger for NullMessenger {
        fn id(&self) -> &str {
            "null"
        }

        async fn send_text(&self, _dialog_token: &DialogToken, _text: &str) -> ApiResult<()> {
            Ok(())
        }

        fn as_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
            self
        }
    }

    #[test]
    fn downcast_to_concrete_type() {
        let boxed: BoxedMessenger = Arc::new(NullMessenger);
        assert!(downcast_messenger::<NullMessenger>(boxed).is_some());
    }
}
