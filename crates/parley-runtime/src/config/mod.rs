//! Configuration loading and schema.

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use schema::{LogFormat, LoggingConfig, ParleyConfig};
