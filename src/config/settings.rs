//! Application settings loaded from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use super::constants::{
    DEFAULT_CACHE_TTL_SECONDS, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_URL,
    DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT, DEFAULT_SHUTDOWN_GRACE_SECONDS,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    /// Redis URL; the in-process cache is used when unset
    pub redis_url: Option<String>,
    pub cache_ttl: Duration,
    pub server_host: String,
    pub server_port: u16,
    pub shutdown_grace: Duration,
}

/// Database connection settings.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database", &self.database)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("cache_ttl", &self.cache_ttl)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("shutdown_grace", &self.shutdown_grace)
            .finish()
    }
}

impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
                max_connections: parse_env("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS),
            },
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.trim().is_empty()),
            cache_ttl: Duration::from_secs(
                parse_env("CACHE_TTL_SECONDS").unwrap_or(DEFAULT_CACHE_TTL_SECONDS),
            ),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_env("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
            shutdown_grace: Duration::from_secs(
                parse_env("SHUTDOWN_GRACE_SECONDS").unwrap_or(DEFAULT_SHUTDOWN_GRACE_SECONDS),
            ),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            redis_url: None,
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            shutdown_grace: Duration::from_secs(DEFAULT_SHUTDOWN_GRACE_SECONDS),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
        }
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
