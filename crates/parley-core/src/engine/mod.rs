//! Engine layer - Rule registration and event dispatch.
//!
//! This module contains the reaction engine:
//! - Handler trait and blanket implementations (Axum-style)
//! - Extractor system for handler parameters
//! - Rules grouping handlers behind a check, with ordering declarations
//! - Central dispatcher walking rules in registration order

pub mod dispatcher;
pub mod extract;
pub mod handler;
pub mod rule;
pub mod rule_builders;

pub use dispatcher::Dispatcher;
pub use extract::{FromContext, WebhookPayload};
pub use handler::{BoxFuture, BoxedHandler, Handler, into_handler};
pub use rule::{CheckFn, OrderingRequirement, Rule};
pub use rule_builders::{on_dialog_message, on_dialog_open, on_webhook};
