//! Rule builder functions for the domain event kinds.
//!
//! Convenience constructors for rules filtering on the standard triggers:
//!
//! ```rust,ignore
//! on_dialog_open().handler(greet_handler);
//! on_dialog_message().handler(echo_handler);
//! on_webhook("conversation.new_message").handler(log_handler);
//! ```

use crate::engine::rule::Rule;
use crate::foundation::event::{EventKind, WebhookEvent};

/// Creates a rule that fires once per newly opened dialog.
pub fn on_dialog_open() -> Rule {
    Rule::new()
        .name("dialog_open")
        .check(|ctx| ctx.event().kind() == EventKind::DialogOpen)
}

/// Creates a rule that fires once per message in any open dialog.
pub fn on_dialog_message() -> Rule {
    Rule::new()
        .name("dialog_message")
        .check(|ctx| ctx.event().kind() == EventKind::DialogMessage)
}

/// Creates a rule that fires for webhook events with the given name.
///
/// Matching is by exact string equality against the delivered event name.
pub fn on_webhook(event_name: impl Into<String>) -> Rule {
    let event_name = event_name.into();
    let name_check = event_name.clone();

    Rule::new()
        .name(format!("webhook:{event_name}"))
        .check(move |ctx| {
            ctx.event()
                .downcast_ref::<WebhookEvent>()
                .is_some_and(|w| w.name == name_check)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::context::EngineContext;
    use crate::foundation::event::{
        BoxedEvent, DialogMessageEvent, DialogOpenEvent, DialogToken, PersonDescriptor, PersonType,
    };
    use serde_json::json;

    fn ctx_for(event: BoxedEvent) -> EngineContext {
        EngineContext::new(event)
    }

    #[test]
    fn webhook_rule_matches_exact_name_only() {
        let rule = on_webhook("conversation.new_message");

        let matching = ctx_for(BoxedEvent::new(WebhookEvent::new(
            "conversation.new_message",
            json!({}),
        )));
        let other = ctx_for(BoxedEvent::new(WebhookEvent::new(
            "conversation.edited",
            json!({}),
        )));

        assert!(rule.matches(&matching));
        assert!(!rule.matches(&other));
    }

    #[test]
    fn dialog_rules_filter_by_kind() {
        let open = ctx_for(BoxedEvent::new(DialogOpenEvent {
            dialog_token: DialogToken::new("d1"),
        }));
        let message = ctx_for(BoxedEvent::new(DialogMessageEvent {
            dialog_token: DialogToken::new("d1"),
            sender: PersonDescriptor::of(PersonType::Visitor),
            text: "hi".into(),
        }));

        assert!(on_dialog_open().matches(&open));
        assert!(!on_dialog_open().matches(&message));
        assert!(on_dialog_message().matches(&message));
        assert!(!on_dialog_message().matches(&open));
    }
}
