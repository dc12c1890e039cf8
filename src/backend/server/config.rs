/**
 * Server Configuration
 *
 * This module handles loading and validation of server configuration.
 *
 * # Configuration Sources
 *
 * Values are layered, lowest precedence first:
 *
 * 1. Built-in defaults (local SQLite file in the user's data directory)
 * 2. An optional TOML file named by `COOKSHARE_CONFIG`
 * 3. Environment variables (`DATABASE_URL`, `SERVER_PORT`, `JWT_SECRET`,
 *    `SESSION_TTL_DAYS`, `BCRYPT_COST`, `CORS_ORIGIN`)
 *
 * # Example TOML
 *
 * ```toml
 * database_url = "sqlite://cookshare.db"
 * port = 8080
 * jwt_secret = "change-me"
 * session_ttl_days = 14
 * ```
 */
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3000;
/// Default session lifetime
pub const DEFAULT_SESSION_TTL_DAYS: i64 = 7;
/// Secret used when none is configured. Only suitable for development.
pub const DEV_JWT_SECRET: &str = "cookshare-dev-secret-change-me";

/// Server configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// sqlx connection string, e.g. `sqlite://cookshare.db`
    pub database_url: String,
    /// Port the HTTP server binds to
    pub port: u16,
    /// HMAC secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime in days
    pub session_ttl_days: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Allowed CORS origin; any origin when `None`
    pub cors_origin: Option<String>,
}

impl ServerConfig {
    /// Create a new ServerConfigBuilder
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Load configuration from the optional TOML file and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(path) = std::env::var("COOKSHARE_CONFIG") {
            builder = builder.merge_file(FileConfig::from_path(Path::new(&path))?);
        }
        builder.merge_env()?.build()
    }

    /// Load configuration from a TOML file only (no environment overrides)
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::builder()
            .merge_file(FileConfig::from_path(path)?)
            .build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingValue("database_url"));
        }
        if self.jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingValue("jwt_secret"));
        }
        if self.session_ttl_days < 1 {
            return Err(ConfigError::Invalid {
                field: "session_ttl_days",
                message: "must be at least 1".to_string(),
            });
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::Invalid {
                field: "bcrypt_cost",
                message: "must be between 4 and 31".to_string(),
            });
        }
        Ok(())
    }
}

/// Default database location: `{data_dir}/cookshare/cookshare.db`
pub fn default_database_url() -> String {
    let mut path = dirs::data_dir().unwrap_or_else(|| std::path::PathBuf::from("."));
    path.push("cookshare");
    path.push("cookshare.db");
    format!("sqlite://{}", path.display())
}

/// Shape of the optional TOML file
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub database_url: Option<String>,
    pub port: Option<u16>,
    pub jwt_secret: Option<String>,
    pub session_ttl_days: Option<i64>,
    pub bcrypt_cost: Option<u32>,
    pub cors_origin: Option<String>,
}

impl FileConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }
}

/// Builder for ServerConfig
#[derive(Debug, Default, Clone)]
pub struct ServerConfigBuilder {
    database_url: Option<String>,
    port: Option<u16>,
    jwt_secret: Option<String>,
    session_ttl_days: Option<i64>,
    bcrypt_cost: Option<u32>,
    cors_origin: Option<String>,
}

impl ServerConfigBuilder {
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = Some(secret.into());
        self
    }

    pub fn session_ttl_days(mut self, days: i64) -> Self {
        self.session_ttl_days = Some(days);
        self
    }

    pub fn bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = Some(cost);
        self
    }

    pub fn cors_origin(mut self, origin: impl Into<String>) -> Self {
        self.cors_origin = Some(origin.into());
        self
    }

    /// Overlay values present in a parsed TOML file
    pub fn merge_file(mut self, file: FileConfig) -> Self {
        self.database_url = file.database_url.or(self.database_url);
        self.port = file.port.or(self.port);
        self.jwt_secret = file.jwt_secret.or(self.jwt_secret);
        self.session_ttl_days = file.session_ttl_days.or(self.session_ttl_days);
        self.bcrypt_cost = file.bcrypt_cost.or(self.bcrypt_cost);
        self.cors_origin = file.cors_origin.or(self.cors_origin);
        self
    }

    /// Overlay values from environment variables
    pub fn merge_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database_url = Some(url);
        }
        if let Some(port) = env_parse::<u16>("SERVER_PORT")? {
            self.port = Some(port);
        }
        if let Ok(secret) = std::env::var("JWT_SECRET") {
            self.jwt_secret = Some(secret);
        }
        if let Some(days) = env_parse::<i64>("SESSION_TTL_DAYS")? {
            self.session_ttl_days = Some(days);
        }
        if let Some(cost) = env_parse::<u32>("BCRYPT_COST")? {
            self.bcrypt_cost = Some(cost);
        }
        if let Ok(origin) = std::env::var("CORS_ORIGIN") {
            self.cors_origin = Some(origin);
        }
        Ok(self)
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<ServerConfig, ConfigError> {
        let jwt_secret = self.jwt_secret.unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.to_string()
        });
        let config = ServerConfig {
            database_url: self.database_url.unwrap_or_else(default_database_url),
            port: self.port.unwrap_or(DEFAULT_PORT),
            jwt_secret,
            session_ttl_days: self.session_ttl_days.unwrap_or(DEFAULT_SESSION_TTL_DAYS),
            bcrypt_cost: self.bcrypt_cost.unwrap_or(bcrypt::DEFAULT_COST),
            cors_origin: self.cors_origin.filter(|origin| !origin.trim().is_empty()),
        };
        config.validate()?;
        Ok(config)
    }
}

fn env_parse<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                field: name,
                message: format!("could not parse '{}'", raw),
            }),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
