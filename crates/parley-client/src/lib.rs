//! # Parley Client
//!
//! HTTP outbound messaging client for the Parley dialog bot toolkit.
//!
//! This crate implements the [`Messenger`](parley_core::Messenger) boundary
//! over HTTP: [`HttpMessenger`] posts text messages into an existing dialog
//! via the hosting framework's bot API.
//!
//! ```rust,ignore
//! use parley_client::{ClientConfig, HttpMessenger};
//!
//! let messenger = HttpMessenger::new(ClientConfig {
//!     api_url: "https://framework.example.com/api".into(),
//!     ..ClientConfig::default()
//! })?;
//! messenger.send_text(&dialog_token, "Hello!").await?;
//! ```

pub mod config;
pub mod http;

pub use config::{ClientConfig, RetryPolicy};
pub use http::HttpMessenger;
