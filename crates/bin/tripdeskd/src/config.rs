//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `tripdesk.toml` in the working directory. Every field has a
//! default so the file is optional. Environment variables take precedence
//! over file values.

use std::path::PathBuf;

use serde::Deserialize;

const CONFIG_FILE: &str = "tripdesk.toml";

/// One directive per workspace crate; `EnvFilter` drops unlisted targets.
const DEFAULT_LOG_FILTER: &str = "tripdeskd=info,tripdesk_app=info,\
    tripdesk_adapter_http_axum=info,tripdesk_adapter_catalog_json=info,\
    tripdesk_adapter_storage_sqlite_sqlx=info,tower_http=debug";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Reference catalog location.
    pub catalogs: CatalogsConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL.
    pub url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// Milliseconds a connection waits on a locked database.
    pub busy_timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CatalogsConfig {
    /// Directory holding `companies.json`, `drivers.json`, `vehicles.json`
    /// and `municipalities.json`.
    pub dir: PathBuf,
}

impl Config {
    /// Load configuration from `tripdesk.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is unreadable or
    /// malformed, or if the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file(CONFIG_FILE)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    /// Apply overrides read through `lookup`, later keys winning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("TRIPDESK_HOST") {
            self.server.host = val;
        }
        if let Some(port) = lookup("TRIPDESK_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = lookup("TRIPDESK_BIND")
            && let Some((host, port)) = val.rsplit_once(':')
        {
            self.server.host = host.to_string();
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("TRIPDESK_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = lookup("TRIPDESK_CATALOG_DIR") {
            self.catalogs.dir = PathBuf::from(val);
        }
        if let Some(val) = lookup("TRIPDESK_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database url must not be empty".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "database max_connections must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:tripdesk.db?mode=rwc".to_string(),
            max_connections: 5,
            busy_timeout_ms: 5_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Default for CatalogsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data/catalogs"),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
