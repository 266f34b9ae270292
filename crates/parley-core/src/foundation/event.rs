//! Event system for the Parley toolkit.
//!
//! This module provides the core event infrastructure:
//!
//! - The domain event structs delivered by the hosting framework
//!   ([`OnboardingOffer`], [`DialogOpenEvent`], [`DialogMessageEvent`],
//!   [`WebhookEvent`])
//! - [`Event`] - Base trait for all events
//! - [`EventKind`] - Event classification used by rule checks
//! - [`FromEvent`] - Trait for extracting typed events
//! - [`EventContext<T>`] - Wrapper providing access to extracted event data
//!
//! # Event Extraction
//!
//! Handlers request the event type they care about and the engine extracts
//! it from the type-erased [`BoxedEvent`]:
//!
//! ```rust,ignore
//! async fn on_message(event: EventContext<DialogMessageEvent>) {
//!     println!("{} wrote: {}", event.dialog_token, event.text);
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

// ============================================================================
// Wire-shaped domain types
// ============================================================================

/// The category of person behind a message or offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PersonType {
    /// A site visitor talking to the bot.
    Visitor,
    /// A human operator.
    Operator,
    /// Another bot participant.
    Bot,
}

/// Opaque identifier of an active dialog session.
///
/// Outbound messages are addressed by dialog token; the token's structure
/// belongs entirely to the hosting framework.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DialogToken(String);

impl DialogToken {
    /// Creates a dialog token from any string-like value.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DialogToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DialogToken {
    fn from(token: &str) -> Self {
        Self(token.to_owned())
    }
}

impl From<String> for DialogToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

/// Describes the sender of a message or the subject of an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDescriptor {
    /// The person category.
    pub person_type: PersonType,
    /// Framework-assigned person id, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
}

impl PersonDescriptor {
    /// Creates a descriptor with only a person type.
    pub fn of(person_type: PersonType) -> Self {
        Self {
            person_type,
            person_id: None,
        }
    }
}

// ============================================================================
// Event Classification
// ============================================================================

/// Classification of event kinds.
///
/// This is the high-level category of an event, used by rule checks to
/// filter events without knowing the specific event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Onboarding offers presented before a dialog begins.
    Onboarding,
    /// A dialog was opened with the bot.
    DialogOpen,
    /// A message arrived in an open dialog.
    DialogMessage,
    /// A named webhook event pushed by the framework.
    Webhook,
}

// ============================================================================
// Core Event Trait
// ============================================================================

/// The base trait for all events flowing through the engine.
///
/// Events are type-erased as `dyn Event` during dispatch and can be downcast
/// to concrete types via `as_any()`. Each event instance is transient: it is
/// produced by the hosting framework and consumed by exactly one dispatch.
pub trait Event: Any + Send + Sync {
    /// Returns the name of this event.
    ///
    /// For webhook events this is the framework-assigned event name
    /// (e.g. `"conversation.new_message"`); for lifecycle events it is a
    /// fixed identifier.
    fn event_name(&self) -> &str;

    /// Returns the high-level event classification.
    fn kind(&self) -> EventKind;

    /// Returns the dialog this event belongs to, when it is dialog-scoped.
    fn dialog_token(&self) -> Option<&DialogToken> {
        None
    }

    /// Returns a reference to self as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

// ============================================================================
// Concrete Events
// ============================================================================

/// A framework-level prompt offered to a visitor before a dialog begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingOffer {
    /// Framework-assigned offer id.
    pub id: String,
    /// The visitor the offer is addressed to.
    pub visitor: PersonDescriptor,
}

impl Event for OnboardingOffer {
    fn event_name(&self) -> &str {
        "onboarding_offer"
    }

    fn kind(&self) -> EventKind {
        EventKind::Onboarding
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fired once per newly opened dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogOpenEvent {
    /// The dialog that was just opened.
    pub dialog_token: DialogToken,
}

impl Event for DialogOpenEvent {
    fn event_name(&self) -> &str {
        "dialog_open"
    }

    fn kind(&self) -> EventKind {
        EventKind::DialogOpen
    }

    fn dialog_token(&self) -> Option<&DialogToken> {
        Some(&self.dialog_token)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Fired once per message in any open dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogMessageEvent {
    /// The dialog the message belongs to.
    pub dialog_token: DialogToken,
    /// Who sent the message.
    pub sender: PersonDescriptor,
    /// Plain-text content of the message.
    pub text: String,
}

impl Event for DialogMessageEvent {
    fn event_name(&self) -> &str {
        "dialog_message"
    }

    fn kind(&self) -> EventKind {
        EventKind::DialogMessage
    }

    fn dialog_token(&self) -> Option<&DialogToken> {
        Some(&self.dialog_token)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A named, typed notification pushed by the framework.
///
/// The payload is kept as raw JSON here; handlers request a typed view via
/// the `WebhookPayload<P>` extractor, which deserializes on extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEvent {
    /// The framework event name, matched by exact string equality.
    pub name: String,
    /// The raw event payload.
    pub payload: serde_json::Value,
}

impl WebhookEvent {
    /// Creates a webhook event from a name and raw payload.
    pub fn new(name: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

impl Event for WebhookEvent {
    fn event_name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> EventKind {
        EventKind::Webhook
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

// ============================================================================
// Event Extraction
// ============================================================================

/// Trait for extracting typed events from a type-erased event.
///
/// Implementations downcast the dispatched event and clone it out so the
/// extracted value can move into a spawned reaction.
pub trait FromEvent: Sized + Clone {
    /// Attempts to extract this event type from the dispatched event.
    fn from_event(event: &dyn Event) -> Option<Self>;
}

impl<T: Event + Clone> FromEvent for T {
    fn from_event(event: &dyn Event) -> Option<Self> {
        event.as_any().downcast_ref::<T>().cloned()
    }
}

// ============================================================================
// Event Context
// ============================================================================

/// Context wrapper providing access to extracted event data.
///
/// This is the primary way handlers receive events. `Deref` gives direct
/// access to the wrapped type's fields:
///
/// ```rust,ignore
/// async fn greet(event: EventContext<DialogOpenEvent>) {
///     println!("dialog opened: {}", event.dialog_token);
/// }
/// ```
#[derive(Clone)]
pub struct EventContext<T: Event + Clone> {
    data: T,
}

impl<T: Event + Clone> EventContext<T> {
    /// Creates a new context with the given data.
    pub fn new(data: T) -> Self {
        Self { data }
    }

    /// Returns the event as a trait object.
    pub fn as_event(&self) -> &dyn Event {
        &self.data
    }

    /// Consumes the context, returning the inner event.
    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: Event + Clone> Deref for EventContext<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl<T: Event + Clone + fmt::Debug> fmt::Debug for EventContext<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventContext")
            .field("data", &self.data)
            .finish()
    }
}

// ============================================================================
// Boxed Event
// ============================================================================

/// A type-erased container for events that supports runtime downcasting.
///
/// `BoxedEvent` wraps any type implementing [`Event`] in an `Arc`, allowing
/// it to be passed through the dispatcher without knowing its concrete type.
#[derive(Clone)]
pub struct BoxedEvent {
    inner: Arc<dyn Event>,
}

impl BoxedEvent {
    /// Creates a new `BoxedEvent` from any type implementing `Event`.
    pub fn new<E: Event + 'static>(event: E) -> Self {
        Self {
            inner: Arc::new(event),
        }
    }

    /// Returns the inner `Arc<dyn Event>`.
    pub fn inner(&self) -> &Arc<dyn Event> {
        &self.inner
    }

    /// Attempts to downcast to a concrete event type.
    pub fn downcast_ref<E: Event + 'static>(&self) -> Option<&E> {
        self.inner.as_any().downcast_ref()
    }

    /// Attempts to extract a typed event using [`FromEvent`].
    pub fn extract<E: FromEvent + Event>(&self) -> Option<EventContext<E>> {
        E::from_event(self.inner.as_ref()).map(EventContext::new)
    }
}

impl Deref for BoxedEvent {
    type Target = dyn Event;

    fn deref(&self) -> &Self::Target {
        self.inner.as_ref()
    }
}

impl fmt::Debug for BoxedEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedEvent")
            .field("event_name", &self.event_name())
            .field("kind", &self.kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn visitor_message(token: &str, text: &str) -> DialogMessageEvent {
        DialogMessageEvent {
            dialog_token: token.into(),
            sender: PersonDescriptor::of(PersonType::Visitor),
            text: text.to_owned(),
        }
    }

    #[test]
    fn extract_matching_event() {
        let event = BoxedEvent::new(visitor_message("d1", "hi"));
        let ctx = event.extract::<DialogMessageEvent>().unwrap();
        assert_eq!(ctx.dialog_token.as_str(), "d1");
        assert_eq!(ctx.text, "hi");
    }

    #[test]
    fn extract_mismatched_event_returns_none() {
        let event = BoxedEvent::new(visitor_message("d1", "hi"));
        assert!(event.extract::<DialogOpenEvent>().is_none());
    }

    #[test]
    fn webhook_event_name_is_dynamic() {
        let event = WebhookEvent::new("conversation.new_message", json!({}));
        assert_eq!(event.event_name(), "conversation.new_message");
        assert_eq!(event.kind(), EventKind::Webhook);
    }

    #[test]
    fn person_type_wire_format() {
        assert_eq!(
            serde_json::to_string(&PersonType::Visitor).unwrap(),
            "\"VISITOR\""
        );
        let parsed: PersonType = serde_json::from_str("\"OPERATOR\"").unwrap();
        assert_eq!(parsed, PersonType::Operator);
    }

    #[test]
    fn dialog_message_wire_format_is_camel_case() {
        let parsed: DialogMessageEvent = serde_json::from_value(json!({
            "dialogToken": "d7",
            "sender": { "personType": "VISITOR" },
            "text": "hello"
        }))
        .unwrap();
        assert_eq!(parsed.dialog_token.as_str(), "d7");
        assert_eq!(parsed.sender.person_type, PersonType::Visitor);
    }
}
