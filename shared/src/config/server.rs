//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{env_list, env_parse, env_string, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Keep-alive timeout in seconds
    #[serde(default = "default_keep_alive")]
    pub keep_alive: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
            workers: 0,
            keep_alive: default_keep_alive(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Load from `AUTH_HTTP_HOST`, `AUTH_HTTP_PORT` and `AUTH_HTTP_WORKERS`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: env_string("AUTH_HTTP_HOST").unwrap_or(defaults.host),
            port: env_parse("AUTH_HTTP_PORT", defaults.port)?,
            workers: env_parse("AUTH_HTTP_WORKERS", defaults.workers)?,
            keep_alive: env_parse("AUTH_HTTP_KEEP_ALIVE", defaults.keep_alive)?,
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; empty means "any" outside production
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Max age for preflight cache in seconds
    #[serde(default = "default_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![],
            max_age: default_max_age(),
        }
    }
}

impl CorsConfig {
    /// Load from `AUTH_CORS_ALLOWED_ORIGINS` (comma separated) and `AUTH_CORS_MAX_AGE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            allowed_origins: env_list("AUTH_CORS_ALLOWED_ORIGINS"),
            max_age: env_parse("AUTH_CORS_MAX_AGE", default_max_age())?,
        })
    }
}

fn default_keep_alive() -> u64 {
    75
}

fn default_max_age() -> usize {
    3600
}
