//! Rule and offer-policy registries.
//!
//! Registries are populated once at process startup and read-only during
//! steady-state operation; the locks only serialize registration against
//! concurrent delivery.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use parley_core::{Dispatcher, OnboardingOffer, OrderingRequirement, Rule};

use crate::error::RegistrationError;

// =============================================================================
// Rule registry
// =============================================================================

/// Holds the registered reaction rules and the per-webhook ordering
/// declarations.
#[derive(Default)]
pub struct RuleRegistry {
    rules: RwLock<Vec<Rule>>,
    webhook_orderings: RwLock<HashMap<String, OrderingRequirement>>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule. Rules fire in registration order.
    pub fn register(&self, rule: Rule) {
        self.rules.write().unwrap().push(rule);
    }

    /// Registers a webhook rule under the given event name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::EmptyEventName`] for a blank name and
    /// [`RegistrationError::DuplicateRule`] when the event name was already
    /// registered.
    pub fn register_webhook(
        &self,
        event_name: &str,
        ordering: OrderingRequirement,
        rule: Rule,
    ) -> Result<(), RegistrationError> {
        if event_name.trim().is_empty() {
            return Err(RegistrationError::EmptyEventName);
        }

        let mut orderings = self.webhook_orderings.write().unwrap();
        if orderings.contains_key(event_name) {
            return Err(RegistrationError::DuplicateRule(event_name.to_owned()));
        }
        orderings.insert(event_name.to_owned(), ordering);
        drop(orderings);

        self.register(rule.ordering(ordering));
        Ok(())
    }

    /// Returns the ordering declaration registered for a webhook event name.
    pub fn webhook_ordering(&self, event_name: &str) -> Option<OrderingRequirement> {
        self.webhook_orderings
            .read()
            .unwrap()
            .get(event_name)
            .copied()
    }

    /// Returns the number of registered rules.
    pub fn rule_count(&self) -> usize {
        self.rules.read().unwrap().len()
    }

    /// Builds a dispatcher over a snapshot of the current rules.
    pub fn dispatcher(&self) -> Dispatcher {
        self.rules
            .read()
            .unwrap()
            .iter()
            .cloned()
            .fold(Dispatcher::new(), Dispatcher::with)
    }
}

// =============================================================================
// Offer policy registry
// =============================================================================

/// Accept/decline decision for an onboarding offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferDecision {
    /// The offer is accepted and a dialog may begin.
    Accept,
    /// The offer is declined.
    Decline,
}

/// A registered onboarding accept predicate.
pub type OfferPredicate = Arc<dyn Fn(&OnboardingOffer) -> bool + Send + Sync>;

/// Holds the onboarding accept policies.
///
/// An offer is accepted when any registered predicate returns `true`; with
/// no policies registered every offer is declined.
#[derive(Default)]
pub struct OfferPolicyRegistry {
    predicates: RwLock<Vec<OfferPredicate>>,
}

impl OfferPolicyRegistry {
    /// Creates an empty policy registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an accept predicate.
    pub fn register<F>(&self, predicate: F)
    where
        F: Fn(&OnboardingOffer) -> bool + Send + Sync + 'static,
    {
        self.predicates.write().unwrap().push(Arc::new(predicate));
    }

    /// Decides whether the given offer is accepted.
    pub fn decide(&self, offer: &OnboardingOffer) -> OfferDecision {
        let predicates = self.predicates.read().unwrap();
        if predicates.iter().any(|p| p(offer)) {
            OfferDecision::Accept
        } else {
            OfferDecision::Decline
        }
    }

    /// Returns the number of registered policies.
    pub fn policy_count(&self) -> usize {
        self.predicates.read().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::{PersonDescriptor, PersonType, on_webhook};

    fn offer(id: &str) -> OnboardingOffer {
        OnboardingOffer {
            id: id.to_owned(),
            visitor: PersonDescriptor::of(PersonType::Visitor),
        }
    }

    #[test]
    fn empty_webhook_name_is_rejected() {
        let registry = RuleRegistry::new();
        let err = registry
            .register_webhook("  ", OrderingRequirement::Ordered, on_webhook("  "))
            .unwrap_err();
        assert!(matches!(err, RegistrationError::EmptyEventName));
    }

    #[test]
    fn duplicate_webhook_name_is_rejected() {
        let registry = RuleRegistry::new();
        registry
            .register_webhook(
                "conversation.new_message",
                OrderingRequirement::IgnoreOrder,
                on_webhook("conversation.new_message"),
            )
            .unwrap();

        let err = registry
            .register_webhook(
                "conversation.new_message",
                OrderingRequirement::Ordered,
                on_webhook("conversation.new_message"),
            )
            .unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateRule(_)));
        assert_eq!(registry.rule_count(), 1);
    }

    #[test]
    fn webhook_ordering_is_recorded() {
        let registry = RuleRegistry::new();
        registry
            .register_webhook(
                "conversation.new_message",
                OrderingRequirement::IgnoreOrder,
                on_webhook("conversation.new_message"),
            )
            .unwrap();

        assert_eq!(
            registry.webhook_ordering("conversation.new_message"),
            Some(OrderingRequirement::IgnoreOrder)
        );
        assert_eq!(registry.webhook_ordering("conversation.edited"), None);
    }

    #[test]
    fn no_policy_declines_every_offer() {
        let registry = OfferPolicyRegistry::new();
        assert_eq!(registry.decide(&offer("o1")), OfferDecision::Decline);
    }

    #[test]
    fn accept_all_policy_accepts_every_offer() {
        let registry = OfferPolicyRegistry::new();
        registry.register(|_| true);
        assert_eq!(registry.decide(&offer("o1")), OfferDecision::Accept);
        assert_eq!(registry.decide(&offer("o2")), OfferDecision::Accept);
    }

    #[test]
    fn selective_policy_consults_the_offer() {
        let registry = OfferPolicyRegistry::new();
        registry.register(|o: &OnboardingOffer| o.id == "wanted");
        assert_eq!(registry.decide(&offer("wanted")), OfferDecision::Accept);
        assert_eq!(registry.decide(&offer("other")), OfferDecision::Decline);
    }
}
