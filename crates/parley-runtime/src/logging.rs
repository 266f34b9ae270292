//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! # Configuration-Based Initialization
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().load()?;
//! logging::init_from_config(&config.logging);
//! ```
//!
//! # Manual Initialization
//!
//! ```rust,ignore
//! LoggingBuilder::new()
//!     .level(Level::DEBUG)
//!     .directive("parley_core=trace")
//!     .init();
//! ```

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{LogFormat, LoggingConfig};

/// Builder for the global tracing subscriber.
pub struct LoggingBuilder {
    level: Level,
    directives: Vec<String>,
    format: LogFormat,
    with_target: bool,
}

impl Default for LoggingBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggingBuilder {
    /// Creates a builder with info-level compact output.
    pub fn new() -> Self {
        Self {
            level: Level::INFO,
            directives: Vec::new(),
            format: LogFormat::Compact,
            with_target: false,
        }
    }

    /// Sets the default log level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Adds an extra filter directive (e.g. `"parley_core=debug"`).
    pub fn directive(mut self, directive: impl Into<String>) -> Self {
        self.directives.push(directive.into());
        self
    }

    /// Sets the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Includes the event target in the output.
    pub fn with_target(mut self, with_target: bool) -> Self {
        self.with_target = with_target;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        let mut filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string().to_lowercase()));
        for directive in &self.directives {
            if let Ok(parsed) = directive.parse() {
                filter = filter.add_directive(parsed);
            }
        }
        filter
    }

    /// Installs the global subscriber.
    ///
    /// Uses `try_init` so repeated initialization (e.g. in tests) is a
    /// no-op rather than a panic.
    pub fn init(self) {
        let filter = self.env_filter();
        let builder = fmt().with_env_filter(filter).with_target(self.with_target);

        let result = match self.format {
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Pretty => builder.pretty().try_init(),
        };

        if result.is_err() {
            tracing::debug!("Global subscriber already set, keeping existing one");
        }
    }
}

/// Initializes logging from a [`LoggingConfig`].
pub fn init_from_config(config: &LoggingConfig) {
    let level = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let mut builder = LoggingBuilder::new().level(level).format(config.format);
    for directive in &config.directives {
        builder = builder.directive(directive.clone());
    }
    builder.init();
}
