//! Runtime orchestration: registration surface and delivery surface.
//!
//! [`BotRuntime`] is the piece the hosting framework talks to. At startup
//! the embedder registers its reactions:
//!
//! ```rust,ignore
//! let runtime = BotRuntime::new()?;
//!
//! runtime.accept_onboarding_offer_if(|_| true);
//! runtime.on_dialog_open(greet_handler);
//! runtime.on_dialog_message(echo_handler);
//! runtime.on_webhook(
//!     "conversation.new_message",
//!     OrderingRequirement::IgnoreOrder,
//!     log_handler,
//! )?;
//!
//! runtime.run().await;
//! ```
//!
//! During operation the hosting framework drives the delivery surface:
//! [`decide_offer`](BotRuntime::decide_offer) for onboarding decisions and
//! [`deliver`](BotRuntime::deliver) for events. `deliver` schedules the
//! dispatch on the tokio runtime and returns immediately; the scheduled
//! reaction runs to completion or fails independently, observed only
//! through logging.

use std::sync::Arc;

use tokio::signal;
use tracing::{debug, info, warn};

use parley_client::HttpMessenger;
use parley_core::{
    BoxedEvent, BoxedMessenger, Event, Handler, OnboardingOffer, OrderingRequirement, Rule,
    on_dialog_message, on_dialog_open, on_webhook,
};

use crate::config::{ConfigLoader, ParleyConfig};
use crate::error::{RegistrationError, RuntimeResult};
use crate::logging;
use crate::registry::{OfferDecision, OfferPolicyRegistry, RuleRegistry};

/// The runtime that wires reactions into the hosting framework.
pub struct BotRuntime {
    config: ParleyConfig,
    rules: Arc<RuleRegistry>,
    offers: Arc<OfferPolicyRegistry>,
    messenger: Option<BoxedMessenger>,
}

impl BotRuntime {
    /// Creates a runtime with automatic configuration loading.
    ///
    /// Searches for `parley.toml` in the current directory, initializes
    /// logging, and constructs the HTTP messenger from the client section.
    /// A missing or unreadable configuration file falls back to defaults.
    pub fn new() -> RuntimeResult<Self> {
        let config = ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_else(|e| {
                eprintln!("Warning: failed to load config ({e}), using defaults");
                ParleyConfig::default()
            });

        Self::from_config(&config)
    }

    /// Creates a runtime from a pre-loaded configuration.
    pub fn from_config(config: &ParleyConfig) -> RuntimeResult<Self> {
        logging::init_from_config(&config.logging);

        let messenger: BoxedMessenger = Arc::new(HttpMessenger::new(config.client.clone())?);

        info!(
            log_level = %config.logging.level,
            api_url = %config.client.api_url,
            "Runtime initialized from configuration"
        );

        Ok(Self::from_parts(config.clone(), Some(messenger)))
    }

    /// Creates a runtime with an explicit messenger (or none at all).
    ///
    /// Useful for embedding a custom transport or for tests.
    pub fn from_parts(config: ParleyConfig, messenger: Option<BoxedMessenger>) -> Self {
        Self {
            config,
            rules: Arc::new(RuleRegistry::new()),
            offers: Arc::new(OfferPolicyRegistry::new()),
            messenger,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ParleyConfig {
        &self.config
    }

    /// Returns the attached messenger, if any.
    pub fn messenger(&self) -> Option<&BoxedMessenger> {
        self.messenger.as_ref()
    }

    // =========================================================================
    // Registration surface (called once at startup)
    // =========================================================================

    /// Registers an onboarding accept policy.
    ///
    /// An offer is accepted when any registered predicate returns `true`.
    pub fn accept_onboarding_offer_if<F>(&self, predicate: F)
    where
        F: Fn(&OnboardingOffer) -> bool + Send + Sync + 'static,
    {
        self.offers.register(predicate);
        debug!("Registered onboarding accept policy");
    }

    /// Registers a reaction fired once per newly opened dialog.
    pub fn on_dialog_open<F, T>(&self, handler: F)
    where
        F: Handler<T> + Send + Sync + 'static,
        T: 'static,
    {
        self.rules.register(on_dialog_open().handler(handler));
        debug!("Registered dialog-open reaction");
    }

    /// Registers a reaction fired once per message in any open dialog.
    pub fn on_dialog_message<F, T>(&self, handler: F)
    where
        F: Handler<T> + Send + Sync + 'static,
        T: 'static,
    {
        self.rules.register(on_dialog_message().handler(handler));
        debug!("Registered dialog-message reaction");
    }

    /// Registers a reaction for webhook events with the given name.
    ///
    /// The typed payload is requested through the handler's
    /// [`WebhookPayload<P>`](parley_core::WebhookPayload) parameter. The
    /// `ordering` declaration is recorded and exposed via
    /// [`webhook_ordering`](Self::webhook_ordering) so the event source can
    /// honor it.
    ///
    /// # Errors
    ///
    /// Fails for an empty event name or a duplicate registration; callers
    /// are expected to propagate this out of startup.
    pub fn on_webhook<F, T>(
        &self,
        event_name: &str,
        ordering: OrderingRequirement,
        handler: F,
    ) -> Result<(), RegistrationError>
    where
        F: Handler<T> + Send + Sync + 'static,
        T: 'static,
    {
        self.rules
            .register_webhook(event_name, ordering, on_webhook(event_name).handler(handler))?;
        debug!(event = %event_name, ?ordering, "Registered webhook reaction");
        Ok(())
    }

    /// Registers a fully built rule.
    pub fn register_rule(&self, rule: Rule) {
        self.rules.register(rule);
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.rule_count()
    }

    // =========================================================================
    // Delivery surface (driven by the hosting framework)
    // =========================================================================

    /// Decides whether an onboarding offer is accepted.
    pub fn decide_offer(&self, offer: &OnboardingOffer) -> OfferDecision {
        let decision = self.offers.decide(offer);
        debug!(offer = %offer.id, ?decision, "Onboarding offer decided");
        decision
    }

    /// Returns the ordering declaration registered for a webhook event name.
    pub fn webhook_ordering(&self, event_name: &str) -> Option<OrderingRequirement> {
        self.rules.webhook_ordering(event_name)
    }

    /// Dispatches an event and waits for all fired reactions to finish.
    ///
    /// Returns `true` if any rule fired.
    pub async fn dispatch<E: Event>(&self, event: E) -> bool {
        self.rules
            .dispatcher()
            .dispatch(BoxedEvent::new(event), self.messenger.clone())
            .await
    }

    /// Schedules an event for dispatch and returns immediately.
    ///
    /// The dispatch runs as a spawned task; its outcome is observed only
    /// through logging. Must be called from within a tokio runtime.
    pub fn deliver<E: Event>(&self, event: E) {
        let dispatcher = self.rules.dispatcher();
        let messenger = self.messenger.clone();
        let event = BoxedEvent::new(event);

        tokio::spawn(async move {
            let fired = dispatcher.dispatch(event, messenger).await;
            if !fired {
                debug!("Event matched no rule");
            }
        });
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Runs until a shutdown signal is received (Ctrl-C or SIGTERM).
    pub async fn run(&self) {
        info!(
            rules = self.rule_count(),
            "Parley runtime is running. Press Ctrl+C to stop."
        );
        Self::wait_for_shutdown().await;
        info!("Runtime stopped");
    }

    /// Runs until the given future completes.
    pub async fn run_until<F>(&self, shutdown: F)
    where
        F: std::future::Future<Output = ()>,
    {
        info!(rules = self.rule_count(), "Parley runtime is running");
        shutdown.await;
        info!("Runtime stopped");
    }

    /// Waits for shutdown signals.
    async fn wait_for_shutdown() {
        #[cfg(unix)]
        {
            let mut sigterm = match signal::unix::signal(signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    warn!(error = %e, "Failed to register SIGTERM handler, waiting on Ctrl+C only");
                    if let Err(e) = signal::ctrl_c().await {
                        warn!(error = %e, "Failed to listen for Ctrl+C");
                    }
                    return;
                }
            };

            tokio::select! {
                _ = signal::ctrl_c() => {
                    info!("Received Ctrl+C, shutting down");
                }
                _ = sigterm.recv() => {
                    info!("Received SIGTERM, shutting down");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = signal::ctrl_c().await {
                warn!(error = %e, "Failed to listen for Ctrl+C");
            }
            info!("Received Ctrl+C, shutting down");
        }
    }
}
