//! # Parley Runtime
//!
//! Orchestration layer for the Parley dialog bot toolkit.
//!
//! This crate provides:
//! - [`BotRuntime`]: the registration surface for reactions and the
//!   delivery surface the hosting framework drives
//! - Rule and offer-policy registries
//! - Configuration loading (`parley.toml` + `PARLEY_*` environment)
//! - Logging setup
//!
//! ```rust,ignore
//! use parley_runtime::BotRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = BotRuntime::new()?;
//!
//!     runtime.accept_onboarding_offer_if(|_| true);
//!     runtime.on_dialog_open(greet_handler);
//!
//!     runtime.run().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod registry;
pub mod runtime;

pub use config::{ConfigError, ConfigLoader, ConfigResult, LogFormat, LoggingConfig, ParleyConfig};
pub use error::{RegistrationError, RuntimeError, RuntimeResult};
pub use logging::LoggingBuilder;
pub use registry::{OfferDecision, OfferPolicyRegistry, RuleRegistry};
pub use runtime::BotRuntime;

// Re-export tracing for use by embedders.
pub use tracing;

/// Prelude providing the commonly used logging macros.
pub mod prelude {
    pub use tracing::{Level, debug, error, info, instrument, span, trace, warn};
}
