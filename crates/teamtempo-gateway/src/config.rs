//! Gateway configuration types.
//!
//! Configuration is read once at startup from `TEAMTEMPO_*` environment
//! variables. There is no runtime reload.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;
use thiserror::Error;

/// Listen address variable.
pub const ENV_LISTEN_ADDR: &str = "TEAMTEMPO_LISTEN_ADDR";
/// `RocksDB` directory variable.
pub const ENV_DATA_DIR: &str = "TEAMTEMPO_DATA_DIR";
/// Base64 signing secret variable.
pub const ENV_JWT_SECRET: &str = "TEAMTEMPO_JWT_SECRET";
/// Token lifetime variable, in seconds.
pub const ENV_JWT_TTL_SECONDS: &str = "TEAMTEMPO_JWT_TTL_SECONDS";
/// Comma-separated CORS origins variable.
pub const ENV_CORS_ORIGINS: &str = "TEAMTEMPO_CORS_ORIGINS";
/// Request timeout variable, in seconds.
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "TEAMTEMPO_REQUEST_TIMEOUT_SECS";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is not set.
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    /// A variable is set but unusable.
    #[error("invalid value for {name}: {reason}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Configuration for the gateway service.
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// Listen address (e.g., "0.0.0.0:8080").
    #[serde(default = "GatewayConfig::default_listen_addr")]
    pub listen_addr: String,

    /// `RocksDB` data directory.
    #[serde(default = "GatewayConfig::default_data_dir")]
    pub data_dir: PathBuf,

    /// Base64-encoded token signing secret.
    #[serde(default)]
    pub jwt_secret: String,

    /// Lifetime of issued tokens in seconds.
    #[serde(default = "GatewayConfig::default_token_ttl")]
    pub token_ttl_seconds: i64,

    /// Allowed CORS origins.
    #[serde(default = "GatewayConfig::default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    #[serde(default = "GatewayConfig::default_max_body")]
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    #[serde(default = "GatewayConfig::default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl GatewayConfig {
    fn default_listen_addr() -> String {
        "0.0.0.0:8080".to_string()
    }

    fn default_data_dir() -> PathBuf {
        PathBuf::from("./data")
    }

    const fn default_token_ttl() -> i64 {
        3600
    }

    fn default_cors_origins() -> Vec<String> {
        vec!["http://localhost:4200".to_string()]
    }

    const fn default_max_body() -> usize {
        1024 * 1024 // 1 MiB
    }

    const fn default_request_timeout() -> u64 {
        30
    }

    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the signing secret is missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the signing secret is missing or any
    /// variable fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup(ENV_LISTEN_ADDR) {
            config.listen_addr = addr;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(dir);
        }

        config.jwt_secret = lookup(ENV_JWT_SECRET)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(ENV_JWT_SECRET))?;

        if let Some(ttl) = lookup(ENV_JWT_TTL_SECONDS) {
            config.token_ttl_seconds = parse_number(ENV_JWT_TTL_SECONDS, &ttl)?;
        }
        config.token_ttl()?;

        if let Some(origins) = lookup(ENV_CORS_ORIGINS) {
            config.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(timeout) = lookup(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout_seconds = parse_number(ENV_REQUEST_TIMEOUT_SECS, &timeout)?;
        }

        Ok(config)
    }

    /// Lifetime of issued tokens.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` unless the lifetime is positive and
    /// representable.
    pub fn token_ttl(&self) -> Result<TimeDelta, ConfigError> {
        TimeDelta::try_seconds(self.token_ttl_seconds)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .ok_or_else(|| ConfigError::Invalid {
                name: ENV_JWT_TTL_SECONDS,
                reason: format!("{} is not a positive duration", self.token_ttl_seconds),
            })
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

fn parse_number<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: e.to_string(),
    })
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            listen_addr: Self::default_listen_addr(),
            data_dir: Self::default_data_dir(),
            jwt_secret: String::new(),
            token_ttl_seconds: Self::default_token_ttl(),
            cors_origins: Self::default_cors_origins(),
            max_body_bytes: Self::default_max_body(),
            request_timeout_seconds: Self::default_request_timeout(),
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("listen_addr", &self.listen_addr)
            .field("data_dir", &self.data_dir)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .field("cors_origins", &self.cors_origins)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .finish()
    }
}
