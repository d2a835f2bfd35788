//! Application configuration.
//!
//! Settings are read from a TOML file whose path comes from
//! `STACKFLOW_CONFIG` (default `stackflow.toml`). A missing file yields the
//! defaults. `DATABASE_URL`, `STACKFLOW_BIND_ADDRESS`, and
//! `STACKFLOW_LOG_LEVEL` override the corresponding file values.
//!
//! ```toml
//! [server]
//! bind_address = "0.0.0.0:8080"
//!
//! [database]
//! url = "postgres://stackflow@localhost/stackflow"
//! max_pool_size = 10
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use crate::provider::{Provider, ProviderCatalog, ProviderError};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming the configuration file.
pub const CONFIG_PATH_VAR: &str = "STACKFLOW_CONFIG";

/// Configuration file read when [`CONFIG_PATH_VAR`] is unset.
pub const DEFAULT_CONFIG_PATH: &str = "stackflow.toml";

const DATABASE_URL_VAR: &str = "DATABASE_URL";
const BIND_ADDRESS_VAR: &str = "STACKFLOW_BIND_ADDRESS";
const LOG_LEVEL_VAR: &str = "STACKFLOW_LOG_LEVEL";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file is not valid TOML for [`AppConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The bind address is not a socket address.
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),
    /// The pool must hold at least one connection.
    #[error("database.max_pool_size must be at least 1")]
    EmptyPool,
    /// The provider catalog is malformed.
    #[error(transparent)]
    Providers(#[from] ProviderError),
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Provider catalog; empty means the built-in catalog.
    pub providers: Vec<Provider>,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_owned(),
        }
    }
}

/// Database settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL; without one the in-memory adapters are
    /// used.
    pub url: Option<String>,
    /// Maximum pooled connections.
    pub max_pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_pool_size: 10,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from the file named by `STACKFLOW_CONFIG` and
    /// applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_PATH_VAR)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
        let mut config = Self::load_file(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file, returning the defaults when it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] or [`ConfigError::Parse`].
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed input.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Applies environment overrides read through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(DATABASE_URL_VAR).filter(|value| !value.trim().is_empty()) {
            self.database.url = Some(url);
        }
        if let Some(address) = lookup(BIND_ADDRESS_VAR).filter(|value| !value.trim().is_empty()) {
            self.server.bind_address = address;
        }
        if let Some(level) = lookup(LOG_LEVEL_VAR).filter(|value| !value.trim().is_empty()) {
            self.logging.level = level;
        }
    }

    /// Checks settings that the types alone cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable bind address, an empty pool,
    /// or a malformed provider catalog.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.bind_address()?;
        if self.database.max_pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        self.provider_catalog()?;
        Ok(())
    }

    /// Returns the parsed listener address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBindAddress`] when it does not parse.
    pub fn bind_address(&self) -> Result<SocketAddr, ConfigError> {
        self.server
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.server.bind_address.clone()))
    }

    /// Builds the provider catalog.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Providers`] for a malformed catalog.
    pub fn provider_catalog(&self) -> Result<ProviderCatalog, ConfigError> {
        Ok(ProviderCatalog::from_config(&self.providers)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let values: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |name| values.get(name).cloned()
    }

    #[rstest]
    fn empty_file_yields_defaults() {
        let config = AppConfig::from_toml("").expect("empty TOML is valid");

        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.database.max_pool_size, 10);
        assert_eq!(config.logging.level, "info");
        assert!(config.providers.is_empty());
    }

    #[rstest]
    fn sections_are_parsed() {
        let config = AppConfig::from_toml(
            r#"
            [server]
            bind_address = "127.0.0.1:9000"

            [database]
            url = "postgres://localhost/stackflow"
            max_pool_size = 4

            [logging]
            level = "debug"
            json = true

            [[providers]]
            name = "local"
            display_name = "Local"
            base_url = "http://localhost:11434"
            requires_api_key = false
            models = []
            "#,
        )
        .expect("valid TOML");

        assert_eq!(config.server.bind_address, "127.0.0.1:9000");
        assert_eq!(
            config.database.url.as_deref(),
            Some("postgres://localhost/stackflow")
        );
        assert_eq!(config.database.max_pool_size, 4);
        assert!(config.logging.json);
        let catalog = config.provider_catalog().expect("valid catalog");
        assert_eq!(catalog.list().len(), 1);
        assert!(catalog.find("openai").is_err());
    }

    #[rstest]
    fn environment_overrides_file_values() {
        let mut config = AppConfig::default();

        config.apply_overrides(env(&[
            ("DATABASE_URL", "postgres://db/stackflow"),
            ("STACKFLOW_BIND_ADDRESS", "127.0.0.1:7000"),
            ("STACKFLOW_LOG_LEVEL", "stackflow=trace"),
        ]));

        assert_eq!(config.database.url.as_deref(), Some("postgres://db/stackflow"));
        assert_eq!(config.server.bind_address, "127.0.0.1:7000");
        assert_eq!(config.logging.level, "stackflow=trace");
    }

    #[rstest]
    fn blank_overrides_are_ignored() {
        let mut config = AppConfig::default();

        config.apply_overrides(env(&[("DATABASE_URL", "  "), ("STACKFLOW_LOG_LEVEL", "")]));

        assert_eq!(config, AppConfig::default());
    }

    #[rstest]
    #[case("[server]\nbind_address = \"not an address\"")]
    #[case("[database]\nmax_pool_size = 0")]
    #[case("[[providers]]\nname = \"\"\ndisplay_name = \"Blank\"\nbase_url = \"\"\nmodels = []")]
    fn invalid_settings_fail_validation(#[case] text: &str) {
        let config = AppConfig::from_toml(text).expect("well-formed TOML");

        assert!(config.validate().is_err());
    }

    #[rstest]
    fn malformed_toml_is_a_parse_error() {
        let result = AppConfig::from_toml("[server");

        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[rstest]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("stackflow-config-that-does-not-exist.toml");

        let config = AppConfig::load_file(&path).expect("missing file is not an error");

        assert_eq!(config, AppConfig::default());
    }
}
