//! # Parley Core
//!
//! Event model and reaction engine for the Parley dialog bot toolkit.
//!
//! ## Architecture Layers
//!
//! ### Foundation Layer
//!
//! Core abstractions and type system:
//! - **Event Model**: the dialog lifecycle and webhook events delivered by
//!   the hosting framework ([`Event`], [`BoxedEvent`])
//! - **Context Management**: dispatch state ([`EngineContext`])
//! - **Messenger Boundary**: the outbound send interface ([`Messenger`])
//!
//! ### Engine Layer
//!
//! Rule registration and dispatch:
//! - **Handler System**: async-fn handlers with parameter extraction
//!   ([`Handler`], [`FromContext`])
//! - **Rules**: check + handlers + ordering declaration ([`Rule`])
//! - **Dispatcher**: ordered rule walk with blocking semantics
//!   ([`Dispatcher`])
//!
//! ## Event Flow
//!
//! ```text
//! ┌───────────────┐     ┌────────────┐     ┌───────────┐
//! │ Hosting       │────▶│ Dispatcher │────▶│   Rule    │
//! │ framework     │     │            │────▶│   Rule    │
//! └───────────────┘     └────────────┘────▶│   Rule    │
//!                                          └───────────┘
//! ```
//!
//! The engine gives no ordering guarantee between events; rules declare
//! their tolerance via [`OrderingRequirement`] and the upstream source is
//! responsible for honoring it.

pub mod engine;
pub mod foundation;

pub use foundation::{
    ApiError, ApiResult, BoxedEvent, BoxedMessenger, DialogMessageEvent, DialogOpenEvent,
    DialogToken, EngineContext, Event, EventContext, EventKind, ExtractError, ExtractResult,
    FromEvent, Messenger, OnboardingOffer, PersonDescriptor, PersonType, WebhookEvent,
    downcast_messenger,
};

pub use engine::{
    BoxFuture, BoxedHandler, Dispatcher, FromContext, Handler, OrderingRequirement, Rule,
    WebhookPayload, into_handler, on_dialog_message, on_dialog_open, on_webhook,
};

/// Prelude for common imports.
pub mod prelude {
    pub use super::engine::{
        Dispatcher, FromContext, Handler, OrderingRequirement, Rule, WebhookPayload,
        on_dialog_message, on_dialog_open, on_webhook,
    };
    pub use super::foundation::*;
}
