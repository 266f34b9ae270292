//! Reaction rules for the engine.
//!
//! A [`Rule`] groups one or more handlers behind a common check. When the
//! check passes against a dispatched event, the handlers run in registration
//! order. A rule fires at most once per event; rules share no mutable state
//! and are independent of one another.
//!
//! # Example
//!
//! ```rust,ignore
//! let rule = Rule::new()
//!     .name("visitor-echo")
//!     .on::<DialogMessageEvent>()
//!     .handler(echo_handler);
//! ```

use std::sync::Arc;

use tracing::{debug, trace};

use crate::engine::handler::{BoxedHandler, Handler, into_handler};
use crate::foundation::context::EngineContext;
use crate::foundation::event::{Event, FromEvent};

/// Delivery-ordering declaration attached to a rule.
///
/// The engine never reorders events itself; this declaration is recorded at
/// registration and exposed to the upstream event source, which owns
/// ordering. A rule declaring [`IgnoreOrder`](OrderingRequirement::IgnoreOrder)
/// must not depend on any prior event's side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderingRequirement {
    /// Events for the same conversation must arrive in order.
    #[default]
    Ordered,
    /// Out-of-order or concurrent delivery is acceptable.
    IgnoreOrder,
}

impl OrderingRequirement {
    /// Whether the upstream source may deliver matching events out of order.
    pub fn is_order_ignorable(self) -> bool {
        self == OrderingRequirement::IgnoreOrder
    }
}

/// A type-erased check function.
pub type CheckFn = Arc<dyn Fn(&EngineContext) -> bool + Send + Sync>;

/// A reaction rule: a check plus the handlers to run when it passes.
#[derive(Clone)]
pub struct Rule {
    /// The check deciding whether this rule fires for an event.
    check_fn: Option<CheckFn>,

    /// The handlers to execute when the check passes.
    handlers: Vec<BoxedHandler>,

    /// Whether to block further rules after this one fires.
    block: bool,

    /// Delivery-ordering declaration for this rule's trigger.
    ordering: OrderingRequirement,

    /// Optional name for registration and logging.
    name: Option<String>,
}

impl Default for Rule {
    fn default() -> Self {
        Self::new()
    }
}

impl Rule {
    /// Creates a new empty rule.
    ///
    /// A rule with no check matches all events.
    pub fn new() -> Self {
        Self {
            check_fn: None,
            handlers: Vec::new(),
            block: false,
            ordering: OrderingRequirement::default(),
            name: None,
        }
    }

    /// Sets a name for this rule.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a custom check function.
    pub fn check<F>(mut self, f: F) -> Self
    where
        F: Fn(&EngineContext) -> bool + Send + Sync + 'static,
    {
        self.check_fn = Some(Arc::new(f));
        self
    }

    /// Sets the check to match events of type `T`.
    pub fn on<T>(self) -> Self
    where
        T: Event + FromEvent + 'static,
    {
        self.check(|ctx| ctx.event().extract::<T>().is_some())
    }

    /// Sets whether this rule blocks further rules once it fires.
    pub fn block(mut self, block: bool) -> Self {
        self.block = block;
        self
    }

    /// Declares the delivery-ordering requirement for this rule.
    pub fn ordering(mut self, ordering: OrderingRequirement) -> Self {
        self.ordering = ordering;
        self
    }

    /// Adds a handler, executed in the order handlers were added.
    pub fn handler<F, T>(mut self, f: F) -> Self
    where
        F: Handler<T> + Send + Sync + 'static,
        T: 'static,
    {
        self.handlers.push(into_handler(f));
        self
    }

    /// Adds a pre-built boxed handler.
    pub fn handler_boxed(mut self, handler: BoxedHandler) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Checks whether this rule should fire for the given event.
    pub fn matches(&self, ctx: &EngineContext) -> bool {
        match &self.check_fn {
            Some(f) => f(ctx),
            None => true,
        }
    }

    /// Returns whether this rule blocks further rules.
    pub fn is_blocking(&self) -> bool {
        self.block
    }

    /// Returns this rule's ordering declaration.
    pub fn ordering_requirement(&self) -> OrderingRequirement {
        self.ordering
    }

    /// Returns the number of handlers in this rule.
    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Returns the name of this rule, if set.
    pub fn get_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Executes all handlers if the check passes.
    ///
    /// Returns `true` if the rule fired, `false` if the check failed.
    pub async fn execute(&self, ctx: Arc<EngineContext>) -> bool {
        if !self.matches(&ctx) {
            trace!(
                rule = self.name.as_deref().unwrap_or("unnamed"),
                "Rule check failed, skipping"
            );
            return false;
        }

        debug!(
            rule = self.name.as_deref().unwrap_or("unnamed"),
            handler_count = self.handlers.len(),
            "Rule check passed, executing handlers"
        );

        for handler in &self.handlers {
            handler(Arc::clone(&ctx)).await;
        }

        true
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("handler_count", &self.handlers.len())
            .field("block", &self.block)
            .field("ordering", &self.ordering)
            .finish()
    }
}
