//! Greeter Bot Demo
//!
//! The canonical Parley wiring: accept every onboarding offer, greet
//! visitors when a dialog opens, echo visitor messages, and log every
//! `conversation.new_message` webhook event.
//!
//! # Running
//!
//! ```bash
//! # Run until Ctrl+C, waiting for the hosting framework to deliver events
//! cargo run --package greeter-bot
//!
//! # Drive the runtime from a JSON-lines feed on stdin
//! echo '{"type":"dialog_open","dialogToken":"d1"}' | cargo run --package greeter-bot -- --feed
//! ```
//!
//! Feed lines are tagged JSON objects:
//!
//! ```json
//! {"type":"onboarding_offer","id":"o1","visitor":{"personType":"VISITOR"}}
//! {"type":"dialog_open","dialogToken":"d1"}
//! {"type":"dialog_message","dialogToken":"d1","sender":{"personType":"VISITOR"},"text":"hi"}
//! {"type":"webhook","name":"conversation.new_message","payload":{"conversationMessage":{"fallbackText":"yo"}}}
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use parley::prelude::*;
use parley::{BotRuntime, ConfigLoader, ParleyConfig};

// ============================================================================
// Webhook payload types
// ============================================================================

/// Payload of the `conversation.new_message` webhook event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationNewMessage {
    conversation_message: ConversationMessage,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationMessage {
    fallback_text: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Greets the visitor when a dialog is opened.
async fn greet(event: EventContext<DialogOpenEvent>, messenger: BoxedMessenger) {
    if let Err(e) = messenger
        .send_text(&event.dialog_token, "Hello, I am a bot!")
        .await
    {
        error!(dialog = %event.dialog_token, error = %e, "Failed to send greeting");
    }
}

/// Echoes every visitor message back into the dialog.
///
/// Messages from operators or other bots produce no reaction.
async fn echo_if_visitor(event: EventContext<DialogMessageEvent>, messenger: BoxedMessenger) {
    if event.sender.person_type != PersonType::Visitor {
        return;
    }

    if let Err(e) = messenger
        .send_text(&event.dialog_token, &format!("You wrote: {}", event.text))
        .await
    {
        error!(dialog = %event.dialog_token, error = %e, "Failed to send echo");
    }
}

/// Logs every message sent anywhere, via the new-message webhook.
async fn log_new_message(payload: WebhookPayload<ConversationNewMessage>) {
    info!(
        "Message received: {}",
        payload.conversation_message.fallback_text
    );
}

// ============================================================================
// Wiring
// ============================================================================

fn register_reactions(runtime: &BotRuntime) -> Result<()> {
    // Accept every onboarding offer.
    runtime.accept_onboarding_offer_if(|_| true);

    runtime.on_dialog_open(greet);
    runtime.on_dialog_message(echo_if_visitor);

    // Logging has no cross-event dependency, so out-of-order delivery
    // of this event type is acceptable.
    runtime.on_webhook(
        "conversation.new_message",
        OrderingRequirement::IgnoreOrder,
        log_new_message,
    )?;

    Ok(())
}

// ============================================================================
// Feed mode
// ============================================================================

/// A framework event read from the stdin feed.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FeedEvent {
    OnboardingOffer(OnboardingOffer),
    DialogOpen(DialogOpenEvent),
    DialogMessage(DialogMessageEvent),
    Webhook(WebhookEvent),
}

async fn run_feed(runtime: &BotRuntime) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let event: FeedEvent = match serde_json::from_str(&line) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "Skipping malformed feed line");
                continue;
            }
        };

        // Await each dispatch so the process can exit cleanly at EOF.
        match event {
            FeedEvent::OnboardingOffer(offer) => {
                let decision = runtime.decide_offer(&offer);
                info!(offer = %offer.id, ?decision, "Onboarding offer");
            }
            FeedEvent::DialogOpen(event) => {
                runtime.dispatch(event).await;
            }
            FeedEvent::DialogMessage(event) => {
                runtime.dispatch(event).await;
            }
            FeedEvent::Webhook(event) => {
                runtime.dispatch(event).await;
            }
        }
    }

    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "greeter-bot", about = "Parley greeter/echo demo bot")]
struct Args {
    /// Path to a configuration file (defaults to ./parley.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Read framework events as JSON lines from stdin instead of waiting
    /// for a hosting framework.
    #[arg(long)]
    feed: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config: ParleyConfig = match &args.config {
        Some(path) => ConfigLoader::new().file(path.clone()).load()?,
        None => ConfigLoader::new()
            .with_current_dir()
            .load()
            .unwrap_or_default(),
    };

    let runtime = BotRuntime::from_config(&config)?;
    register_reactions(&runtime)?;

    if args.feed {
        run_feed(&runtime).await?;
    } else {
        runtime.run().await;
    }

    Ok(())
}
