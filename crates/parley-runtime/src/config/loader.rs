//! Configuration loader using figment.
//!
//! Sources are layered, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `parley.toml` from the search paths (or an explicit file)
//! 3. Environment variables (`PARLEY_*`)
//!
//! Environment variables map with the `PARLEY_` prefix and `__` as the
//! nesting separator: `PARLEY_LOGGING__LEVEL=debug` → `logging.level`,
//! `PARLEY_CLIENT__API_URL=...` → `client.api_url`.
//!
//! # Example
//!
//! ```rust,ignore
//! let config = ConfigLoader::new().with_current_dir().load()?;
//! ```

use std::path::PathBuf;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use tracing::debug;

use super::error::{ConfigError, ConfigResult};
use super::schema::ParleyConfig;

/// Default configuration file name searched in each search path.
const CONFIG_FILE_NAME: &str = "parley.toml";

/// Configuration loader with figment-based multi-source support.
pub struct ConfigLoader {
    search_paths: Vec<PathBuf>,
    config_file: Option<PathBuf>,
    load_env: bool,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Creates a new configuration loader with defaults.
    pub fn new() -> Self {
        Self {
            search_paths: Vec::new(),
            config_file: None,
            load_env: true,
        }
    }

    /// Adds the current directory to the search paths.
    pub fn with_current_dir(mut self) -> Self {
        if let Ok(cwd) = std::env::current_dir() {
            self.search_paths.push(cwd);
        }
        self
    }

    /// Adds a search path for `parley.toml`.
    pub fn search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Sets a specific configuration file to load, bypassing the search.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// Enables loading environment variables (enabled by default).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Loads the configuration from all configured sources.
    pub fn load(self) -> ConfigResult<ParleyConfig> {
        let mut figment = Figment::from(Serialized::defaults(ParleyConfig::default()));

        if let Some(file) = &self.config_file {
            debug!(file = %file.display(), "Loading configuration file");
            figment = figment.merge(Toml::file_exact(file));
        } else {
            for path in &self.search_paths {
                let candidate = path.join(CONFIG_FILE_NAME);
                if candidate.is_file() {
                    debug!(file = %candidate.display(), "Loading configuration file");
                    figment = figment.merge(Toml::file_exact(candidate));
                    break;
                }
            }
        }

        if self.load_env {
            figment = figment.merge(Env::prefixed("PARLEY_").split("__"));
        }

        figment.extract().map_err(ConfigError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_defaults_without_sources() {
        let config = ConfigLoader::new().without_env().load().unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.client.api_url, "http://localhost:8080");
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let dir = std::env::temp_dir().join("parley-loader-test");
        std::fs::create_dir_all(&dir).unwrap();
        let file = dir.join("custom.toml");
        std::fs::write(
            &file,
            "[client]\napi_url = \"https://example.com/api\"\n",
        )
        .unwrap();

        let config = ConfigLoader::new()
            .file(&file)
            .without_env()
            .load()
            .unwrap();
        assert_eq!(config.client.api_url, "https://example.com/api");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn env_overrides_file_and_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE_NAME,
                "[client]\napi_url = \"https://file.example.com\"\ntimeout_ms = 5000\n",
            )?;
            jail.set_env("PARLEY_CLIENT__API_URL", "https://env.example.com");

            let config = ConfigLoader::new()
                .search_path(jail.directory())
                .load()
                .unwrap();

            // Env wins over the file, the file wins over defaults.
            assert_eq!(config.client.api_url, "https://env.example.com");
            assert_eq!(config.client.timeout_ms, 5000);
            assert_eq!(config.logging.level, "info");
            Ok(())
        });
    }
}
