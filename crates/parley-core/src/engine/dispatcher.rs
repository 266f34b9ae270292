//! Event dispatcher for the reaction engine.
//!
//! The [`Dispatcher`] receives events and distributes them to registered
//! rules:
//!
//! 1. Rules are checked in registration order
//! 2. For each rule whose check passes, all handlers are executed
//! 3. If a firing rule is blocking, dispatch stops
//!
//! The dispatcher itself is awaitable; the fire-and-forget boundary lives
//! in the runtime's delivery surface, which spawns one task per dispatched
//! event.

use std::sync::Arc;

use tracing::{Instrument, Level, debug, span};

use crate::engine::rule::Rule;
use crate::foundation::context::EngineContext;
use crate::foundation::event::BoxedEvent;
use crate::foundation::messenger::BoxedMessenger;

/// The central event dispatcher.
///
/// Maintains the registered rules and walks them in order for every
/// dispatched event, respecting blocking semantics. Each rule is invoked at
/// most once per event; the dispatcher performs no retries and gives no
/// ordering guarantee between events.
#[derive(Default, Clone)]
pub struct Dispatcher {
    rules: Vec<Rule>,
}

impl Dispatcher {
    /// Creates a new, empty dispatcher.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Adds a rule. Rules are checked in the order they are added.
    pub fn add(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// Adds a rule (builder pattern).
    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the registered rules.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Dispatches an event to all registered rules.
    ///
    /// Returns `true` if any rule fired.
    pub async fn dispatch(&self, event: BoxedEvent, messenger: Option<BoxedMessenger>) -> bool {
        let event_name = event.event_name().to_owned();
        let span = span!(Level::DEBUG, "dispatch", event_name = %event_name);

        let ctx = Arc::new(match messenger {
            Some(m) => EngineContext::with_messenger(event, m),
            None => EngineContext::new(event),
        });

        async move {
            let mut any_fired = false;

            for rule in &self.rules {
                if rule.execute(Arc::clone(&ctx)).await {
                    any_fired = true;

                    if rule.is_blocking() {
                        debug!(
                            rule = rule.get_name().unwrap_or("unnamed"),
                            "Blocking rule fired, stopping dispatch"
                        );
                        break;
                    }
                }
            }

            any_fired
        }
        .instrument(span)
        .await
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("rule_count", &self.rules.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::event::{DialogOpenEvent, DialogToken};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn open_event() -> BoxedEvent {
        BoxedEvent::new(DialogOpenEvent {
            dialog_token: DialogToken::new("d1"),
        })
    }

    #[tokio::test]
    async fn dispatch_no_rules() {
        let dispatcher = Dispatcher::new();
        assert!(!dispatcher.dispatch(open_event(), None).await);
    }

    #[tokio::test]
    async fn dispatch_with_rule() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let mut dispatcher = Dispatcher::new();
        dispatcher.add(Rule::new().check(|_| true).handler(move || {
            let c = Arc::clone(&counter_clone);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        }));

        assert!(dispatcher.dispatch(open_event(), None).await);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rule_fires_at_most_once_per_event() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let mut dispatcher = Dispatcher::new();
        dispatcher.add(Rule::new().check(|_| true).handler(move || {
            let c = Arc::clone(&counter_clone);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        }));

        dispatcher.dispatch(open_event(), None).await;
        dispatcher.dispatch(open_event(), None).await;

        // Replay is not deduplicated: two events, two firings.
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn blocking_rule_stops_dispatch() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter1 = Arc::clone(&counter);
        let counter2 = Arc::clone(&counter);

        let mut dispatcher = Dispatcher::new();

        dispatcher.add(Rule::new().check(|_| true).block(true).handler(move || {
            let c = Arc::clone(&counter1);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        }));

        // Should not run.
        dispatcher.add(Rule::new().check(|_| true).handler(move || {
            let c = Arc::clone(&counter2);
            async move {
                c.fetch_add(10, Ordering::SeqCst);
            }
        }));

        dispatcher.dispatch(open_event(), None).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_blocking_rules_all_run() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter1 = Arc::clone(&counter);
        let counter2 = Arc::clone(&counter);

        let mut dispatcher = Dispatcher::new();

        dispatcher.add(Rule::new().check(|_| true).handler(move || {
            let c = Arc::clone(&counter1);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        }));

        dispatcher.add(Rule::new().check(|_| true).handler(move || {
            let c = Arc::clone(&counter2);
            async move {
                c.fetch_add(10, Ordering::SeqCst);
            }
        }));

        dispatcher.dispatch(open_event(), None).await;
        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[tokio::test]
    async fn failed_check_does_not_fire() {
        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = Arc::clone(&counter);

        let mut dispatcher = Dispatcher::new();
        dispatcher.add(Rule::new().check(|_| false).handler(move || {
            let c = Arc::clone(&counter_clone);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
            }
        }));

        assert!(!dispatcher.dispatch(open_event(), None).await);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }
}
