//! Configuration schema definitions.

use parley_client::ClientConfig;
use serde::{Deserialize, Serialize};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParleyConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Outbound messaging client settings.
    #[serde(default)]
    pub client: ClientConfig,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Single-line compact output.
    #[default]
    Compact,
    /// Multi-line human-friendly output.
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Extra filter directives (e.g. `"parley_core=debug"`).
    #[serde(default)]
    pub directives: Vec<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            directives: Vec::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = ParleyConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Compact);
        assert!(config.logging.directives.is_empty());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ParleyConfig = toml_from_str(
            r#"
            [logging]
            level = "debug"
            "#,
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.client.timeout_ms, 30000);
    }

    fn toml_from_str(s: &str) -> ParleyConfig {
        use figment::Figment;
        use figment::providers::{Format, Toml};
        Figment::new()
            .merge(Toml::string(s))
            .extract()
            .expect("valid test config")
    }
}
