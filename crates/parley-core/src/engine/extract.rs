//! Extractor system for the reaction engine.
//!
//! This module provides the [`FromContext`] trait, which defines how types
//! are extracted from an [`EngineContext`] for use as handler parameters,
//! plus the built-in extractors.

use std::ops::Deref;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tracing::warn;

use crate::foundation::context::EngineContext;
use crate::foundation::error::{ExtractError, ExtractResult};
use crate::foundation::event::{BoxedEvent, Event, EventContext, FromEvent, WebhookEvent};
use crate::foundation::messenger::{BoxedMessenger, Messenger, downcast_messenger};

/// A trait for types that can be extracted from an [`EngineContext`].
///
/// Types implementing this trait can be used directly as handler function
/// parameters. Extraction can fail when the required data is not available,
/// in which case the handler is skipped.
pub trait FromContext: Sized {
    /// Attempts to extract this type from the given context.
    fn from_context(ctx: &EngineContext) -> ExtractResult<Self>;
}

/// Extracts the dispatched event without knowing its concrete type.
impl FromContext for BoxedEvent {
    fn from_context(ctx: &EngineContext) -> ExtractResult<Self> {
        Ok(ctx.event().clone())
    }
}

/// Allows optional parameters that may or may not be extractable.
impl<T: FromContext> FromContext for Option<T> {
    fn from_context(ctx: &EngineContext) -> ExtractResult<Self> {
        Ok(T::from_context(ctx).ok())
    }
}

/// Extracts a typed event view.
///
/// ```rust,ignore
/// async fn echo(event: EventContext<DialogMessageEvent>) {
///     println!("{}", event.text);
/// }
/// ```
impl<T: FromEvent + Clone + Event> FromContext for EventContext<T> {
    fn from_context(ctx: &EngineContext) -> ExtractResult<Self> {
        ctx.event()
            .extract::<T>()
            .ok_or_else(|| ExtractError::EventTypeMismatch {
                expected: std::any::type_name::<T>(),
                got: ctx.event().event_name().to_owned(),
            })
    }
}

/// Extracts the outbound messenger.
impl FromContext for BoxedMessenger {
    fn from_context(ctx: &EngineContext) -> ExtractResult<Self> {
        ctx.messenger_arc().ok_or(ExtractError::MissingMessenger)
    }
}

/// Extracts a concrete messenger type, giving handlers access to
/// transport-specific APIs.
impl<T: Messenger + 'static> FromContext for Arc<T> {
    fn from_context(ctx: &EngineContext) -> ExtractResult<Self> {
        let messenger = ctx.messenger_arc().ok_or(ExtractError::MissingMessenger)?;
        downcast_messenger::<T>(messenger).ok_or_else(|| ExtractError::MessengerTypeMismatch {
            expected: std::any::type_name::<T>(),
        })
    }
}

// ============================================================================
// Webhook payload extractor
// ============================================================================

/// Typed view of a webhook event payload.
///
/// Deserializes the raw payload of the dispatched [`WebhookEvent`] into `P`
/// at extraction time. When the payload does not match the expected shape
/// the handler is skipped and a warning is logged; the engine does not
/// treat this as a dispatch error.
///
/// ```rust,ignore
/// #[derive(Clone, Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct NewMessage { fallback_text: String }
///
/// async fn log_message(payload: WebhookPayload<NewMessage>) {
///     info!("message received: {}", payload.fallback_text);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct WebhookPayload<P>(pub P);

impl<P> WebhookPayload<P> {
    /// Consumes the extractor, returning the inner payload.
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P> Deref for WebhookPayload<P> {
    type Target = P;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<P: DeserializeOwned> FromContext for WebhookPayload<P> {
    fn from_context(ctx: &EngineContext) -> ExtractResult<Self> {
        let webhook = ctx.event().downcast_ref::<WebhookEvent>().ok_or_else(|| {
            ExtractError::EventTypeMismatch {
                expected: std::any::type_name::<WebhookEvent>(),
                got: ctx.event().event_name().to_owned(),
            }
        })?;

        match serde_json::from_value::<P>(webhook.payload.clone()) {
            Ok(payload) => Ok(WebhookPayload(payload)),
            Err(e) => {
                warn!(
                    event = %webhook.name,
                    error = %e,
                    "Webhook payload did not match expected shape, skipping handler"
                );
                Err(ExtractError::PayloadMismatch {
                    event: webhook.name.clone(),
                    reason: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::event::{DialogOpenEvent, DialogToken};
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct NewMessage {
        fallback_text: String,
    }

    #[test]
    fn webhook_payload_deserializes() {
        let event = BoxedEvent::new(WebhookEvent::new(
            "conversation.new_message",
            json!({ "fallbackText": "yo" }),
        ));
        let ctx = EngineContext::new(event);

        let payload = WebhookPayload::<NewMessage>::from_context(&ctx).unwrap();
        assert_eq!(payload.fallback_text, "yo");
    }

    #[test]
    fn webhook_payload_mismatch_is_extract_error() {
        let event = BoxedEvent::new(WebhookEvent::new(
            "conversation.new_message",
            json!({ "somethingElse": 3 }),
        ));
        let ctx = EngineContext::new(event);

        let err = WebhookPayload::<NewMessage>::from_context(&ctx).unwrap_err();
        assert!(matches!(err, ExtractError::PayloadMismatch { .. }));
    }

    #[test]
    fn webhook_payload_on_non_webhook_event() {
        let event = BoxedEvent::new(DialogOpenEvent {
            dialog_token: DialogToken::new("d1"),
        });
        let ctx = EngineContext::new(event);

        let err = WebhookPayload::<NewMessage>::from_context(&ctx).unwrap_err();
        assert!(matches!(err, ExtractError::EventTypeMismatch { .. }));
    }

    #[test]
    fn missing_messenger_is_extract_error() {
        let event = BoxedEvent::new(DialogOpenEvent {
            dialog_token: DialogToken::new("d1"),
        });
        let ctx = EngineContext::new(event);

        assert!(matches!(
            BoxedMessenger::from_context(&ctx),
            Err(ExtractError::MissingMessenger)
        ));
    }
}
