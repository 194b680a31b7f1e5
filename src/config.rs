//! Service configuration.
//!
//! Loaded from the TOML file named by `ORDER_SERVICE_CONFIG` when set,
//! otherwise built from defaults. `HTTP_PORT` and `SCYLLA_NODES`
//! (comma-separated) override the corresponding values.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::utils::RetryConfig;

pub const CONFIG_PATH_ENV: &str = "ORDER_SERVICE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub scylla: ScyllaConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScyllaConfig {
    pub known_nodes: Vec<String>,
    pub keyspace: String,
    pub replication_factor: u32,
    pub connect_retry: ConnectRetryConfig,
}

impl Default for ScyllaConfig {
    fn default() -> Self {
        Self {
            known_nodes: vec!["127.0.0.1:9042".to_string()],
            keyspace: "orders_ks".to_string(),
            replication_factor: 1,
            connect_retry: ConnectRetryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConnectRetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ConnectRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            initial_delay_ms: 500,
            max_delay_ms: 10_000,
        }
    }
}

impl From<&ConnectRetryConfig> for RetryConfig {
    fn from(config: &ConnectRetryConfig) -> Self {
        RetryConfig {
            max_attempts: config.max_attempts,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
            ..RetryConfig::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info,order_lifecycle=debug".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse configuration from TOML text and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// File named by `ORDER_SERVICE_CONFIG` (or defaults), then env overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(port) = lookup("HTTP_PORT") {
            self.http.port = port
                .parse()
                .map_err(|_| ConfigError::Validation(format!("HTTP_PORT is not a port: {}", port)))?;
        }

        if let Some(nodes) = lookup("SCYLLA_NODES") {
            self.scylla.known_nodes = nodes
                .split(',')
                .map(str::trim)
                .filter(|node| !node.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.http.port == 0 {
            return Err(ConfigError::Validation("http.port must be non-zero".to_string()));
        }

        if self.scylla.known_nodes.is_empty() {
            return Err(ConfigError::Validation(
                "scylla.known_nodes must list at least one node".to_string(),
            ));
        }

        if self.scylla.keyspace.is_empty() {
            return Err(ConfigError::Validation("scylla.keyspace must be set".to_string()));
        }

        if self.scylla.connect_retry.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "scylla.connect_retry.max_attempts must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}
