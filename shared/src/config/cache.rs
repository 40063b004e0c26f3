//! Redis configuration module

use serde::{Deserialize, Serialize};

use super::{env_parse, env_string, ConfigError};

/// Redis connection configuration used by the session store
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    /// Redis connection URL
    pub url: String,

    /// Connection timeout in seconds
    pub connection_timeout: u64,

    /// Response timeout in seconds, applied to every store round-trip
    pub response_timeout: u64,

    /// Connection attempts made at startup before giving up
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,

    /// Key prefix for session records
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            url: String::from("redis://127.0.0.1:6379"),
            connection_timeout: 5,
            response_timeout: 2,
            connect_attempts: default_connect_attempts(),
            key_prefix: default_key_prefix(),
        }
    }
}

impl CacheConfig {
    /// Create a new cache configuration with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Load from environment variables
    ///
    /// `AUTH_REDIS_URL` wins when set; otherwise the URL is assembled from
    /// `AUTH_REDIS_HOST`, `AUTH_REDIS_PASSWORD` and `AUTH_REDIS_DB`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let url = match env_string("AUTH_REDIS_URL") {
            Some(url) => url,
            None => match env_string("AUTH_REDIS_HOST") {
                Some(host) => build_url(
                    &host,
                    env_string("AUTH_REDIS_PASSWORD").as_deref(),
                    env_parse("AUTH_REDIS_DB", 0u8)?,
                ),
                None => defaults.url,
            },
        };

        Ok(Self {
            url,
            connection_timeout: env_parse("AUTH_REDIS_CONNECT_TIMEOUT", defaults.connection_timeout)?,
            response_timeout: env_parse("AUTH_REDIS_RESPONSE_TIMEOUT", defaults.response_timeout)?,
            connect_attempts: env_parse("AUTH_REDIS_CONNECT_ATTEMPTS", defaults.connect_attempts)?,
            key_prefix: env_string("AUTH_REDIS_KEY_PREFIX").unwrap_or(defaults.key_prefix),
        })
    }

    /// Set the key prefix for session keys
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Generate a cache key with prefix
    pub fn make_key(&self, key: &str) -> String {
        if self.key_prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}:{}", self.key_prefix, key)
        }
    }
}

fn build_url(host: &str, password: Option<&str>, db: u8) -> String {
    match password {
        Some(password) => format!("redis://:{}@{}/{}", password, host, db),
        None => format!("redis://{}/{}", host, db),
    }
}

fn default_connect_attempts() -> u32 {
    3
}

fn default_key_prefix() -> String {
    String::from("refresh_token")
}
