//! Gateway configuration with validation.
//!
//! Sourced from the environment: `PORT`, `REMOTE_URL`, `ENV`, `DATA_DIR`.
//! `ENV=production` tightens per-IP rate limiting; development leaves it
//! relaxed so local tooling is never throttled.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Deployment environment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

/// Main gateway configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Listen port (default: 3011).
    pub port: u16,
    /// Base URL of the remote object store.
    pub remote_url: String,
    /// Deployment environment.
    pub env: Environment,
    /// Base directory for `contracts/`, `keys/`, `users/`.
    pub data_dir: String,
    /// Rate limiting configuration.
    pub rate_limit: RateLimitConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 3011,
            remote_url: "http://127.0.0.1:3003".to_string(),
            env: Environment::Development,
            data_dir: "./data".to_string(),
            rate_limit: RateLimitConfig::for_env(Environment::Development),
        }
    }
}

impl GatewayConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(port) = std::env::var("PORT") {
            config.port = port
                .parse()
                .map_err(|_| ConfigError::InvalidPort(port.clone()))?;
        }
        if let Ok(remote_url) = std::env::var("REMOTE_URL") {
            config.remote_url = remote_url;
        }
        if let Ok(env) = std::env::var("ENV") {
            config.env = Environment::parse(&env);
            config.rate_limit = RateLimitConfig::for_env(config.env);
        }
        if let Ok(data_dir) = std::env::var("DATA_DIR") {
            config.data_dir = data_dir;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.remote_url.is_empty() {
            return Err(ConfigError::Invalid("REMOTE_URL cannot be empty".into()));
        }
        if self.rate_limit.enabled && self.rate_limit.requests_per_second == 0 {
            return Err(ConfigError::Invalid(
                "requests_per_second cannot be 0".into(),
            ));
        }
        Ok(())
    }

    /// Bind address for the HTTP server.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Per-IP rate limiting configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Enable rate limiting.
    pub enabled: bool,
    /// Requests per second per IP.
    pub requests_per_second: u32,
    /// Burst allowance (token bucket).
    pub burst_size: u32,
    /// IPs exempt from limiting.
    pub whitelist: Vec<IpAddr>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::for_env(Environment::Development)
    }
}

impl RateLimitConfig {
    /// Strictness follows the deployment environment.
    pub fn for_env(env: Environment) -> Self {
        match env {
            Environment::Production => Self {
                enabled: true,
                requests_per_second: 20,
                burst_size: 40,
                whitelist: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
            },
            Environment::Development => Self {
                enabled: true,
                requests_per_second: 200,
                burst_size: 400,
                whitelist: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
            },
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// PORT did not parse as a u16.
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),
    /// General configuration error.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
