//! # Parley
//!
//! A small, type-safe reaction toolkit for dialog bot middleware.
//!
//! Parley wires declarative reactions into a hosting bot/webhook framework:
//! accept onboarding offers by predicate, react to dialog lifecycle events,
//! handle named webhook events with typed payloads, and post text back into
//! dialogs through an HTTP messaging client.
//!
//! This crate re-exports the public API of the workspace:
//!
//! - [`parley_core`]: event model and reaction engine
//! - [`parley_client`]: HTTP outbound messaging client
//! - [`parley_runtime`]: runtime orchestration, configuration, logging
//!
//! ## Example
//!
//! ```rust,ignore
//! use parley::prelude::*;
//! use parley::BotRuntime;
//!
//! async fn greet(event: EventContext<DialogOpenEvent>, messenger: BoxedMessenger) {
//!     if let Err(e) = messenger.send_text(&event.dialog_token, "Hello, I am a bot!").await {
//!         tracing::error!(error = %e, "Failed to send greeting");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = BotRuntime::new()?;
//!     runtime.accept_onboarding_offer_if(|_| true);
//!     runtime.on_dialog_open(greet);
//!     runtime.run().await;
//!     Ok(())
//! }
//! ```

pub use parley_client;
pub use parley_core;
pub use parley_runtime;

pub use parley_client::{ClientConfig, HttpMessenger, RetryPolicy};
pub use parley_core::{
    ApiError, ApiResult, BoxedEvent, BoxedMessenger, DialogMessageEvent, DialogOpenEvent,
    DialogToken, EngineContext, Event, EventContext, EventKind, Messenger, OnboardingOffer,
    OrderingRequirement, PersonDescriptor, PersonType, Rule, WebhookEvent, WebhookPayload,
};
pub use parley_runtime::{
    BotRuntime, ConfigLoader, LoggingBuilder, OfferDecision, ParleyConfig, RegistrationError,
    RuntimeError,
};

/// Prelude for common imports.
pub mod prelude {
    pub use parley_core::prelude::*;
    pub use parley_runtime::prelude::*;
}
