//! Foundation layer - Core abstractions and type system.
//!
//! This module contains the fundamental building blocks of Parley:
//! - Domain event model and type-erased event passing
//! - Context management for dispatch
//! - The outbound messenger boundary

pub mod context;
pub mod error;
pub mod event;
pub mod messenger;

pub use context::EngineContext;
pub use error::{ApiError, ApiResult, ExtractError, ExtractResult};
pub use event::{
    BoxedEvent, DialogMessageEvent, DialogOpenEvent, DialogToken, Event, EventContext, EventKind,
    FromEvent, OnboardingOffer, PersonDescriptor, PersonType, WebhookEvent,
};
pub use messenger::{BoxedMessenger, Messenger, downcast_messenger};
