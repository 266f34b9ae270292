//! Engine context passed to handlers during dispatch.

use crate::foundation::event::BoxedEvent;
use crate::foundation::messenger::BoxedMessenger;

/// The context object handlers extract their parameters from.
///
/// `EngineContext` wraps the dispatched [`BoxedEvent`] together with the
/// outbound messenger, when one is attached. It is shared across the
/// handlers of one dispatch via `Arc` and is read-only; whether dispatch
/// continues past a rule is decided by the rule's blocking flag alone.
pub struct EngineContext {
    /// The event being dispatched.
    event: BoxedEvent,
    /// The outbound messenger, if one is attached.
    messenger: Option<BoxedMessenger>,
}

impl EngineContext {
    /// Creates a context wrapping the given event, without a messenger.
    pub fn new(event: BoxedEvent) -> Self {
        Self {
            event,
            messenger: None,
        }
    }

    /// Creates a context with an attached messenger.
    pub fn with_messenger(event: BoxedEvent, messenger: BoxedMessenger) -> Self {
        Self {
            event,
            messenger: Some(messenger),
        }
    }

    /// Returns the dispatched event.
    pub fn event(&self) -> &BoxedEvent {
        &self.event
    }

    /// Returns the attached messenger, if any.
    pub fn messenger(&self) -> Option<&BoxedMessenger> {
        self.messenger.as_ref()
    }

    /// Returns a clone of the messenger Arc, if any.
    pub fn messenger_arc(&self) -> Option<BoxedMessenger> {
        self.messenger.clone()
    }
}

impl std::fmt::Debug for EngineContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineContext")
            .field("event", &self.event)
            .field("has_messenger", &self.messenger.is_some())
            .finish()
    }
}
