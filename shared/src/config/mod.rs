//! Configuration module with business-specific sub-modules
//!
//! Everything is read from the process environment (optionally seeded from a
//! `.env` file):
//! - `auth` - access token signing, refresh sessions, user service client
//! - `cache` - Redis connection used by the session store
//! - `database` - MySQL connection used by the session store
//! - `environment` - environment detection and logging configuration
//! - `server` - HTTP server and CORS configuration

pub mod auth;
pub mod cache;
pub mod database;
pub mod environment;
pub mod server;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

pub use auth::{JwtAlgorithm, JwtConfig, RefreshTokenConfig, UserServiceConfig};
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::{CorsConfig, ServerConfig};

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },

    #[error("Missing required setting: {0}")]
    Missing(String),

    #[error("Invalid configuration: {0}")]
    Validation(String),
}

/// Which backend keeps refresh sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Redis,
    Mysql,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "redis" => Ok(StoreBackend::Redis),
            "mysql" => Ok(StoreBackend::Mysql),
            _ => Err(()),
        }
    }
}

impl Default for StoreBackend {
    fn default() -> Self {
        StoreBackend::Redis
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub store: StoreBackend,
    pub cache: CacheConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub refresh: RefreshTokenConfig,
    pub user_service: UserServiceConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            server: ServerConfig::default(),
            cors: CorsConfig::default(),
            store: StoreBackend::default(),
            cache: CacheConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            refresh: RefreshTokenConfig::default(),
            user_service: UserServiceConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, seeding it from `.env` first
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside local development
        let _ = dotenvy::dotenv();

        let environment = Environment::from_env();
        let store = match env_string("AUTH_STORE_BACKEND") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "AUTH_STORE_BACKEND".to_string(),
                value,
            })?,
            None => StoreBackend::default(),
        };

        let config = Self {
            environment,
            server: ServerConfig::from_env()?,
            cors: CorsConfig::from_env()?,
            store,
            cache: CacheConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            refresh: RefreshTokenConfig::from_env()?,
            user_service: UserServiceConfig::from_env()?,
            logging: LoggingConfig::from_env(environment)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the service cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "AUTH_HTTP_PORT must be in 1..=65535".to_string(),
            ));
        }
        self.jwt.validate()?;
        self.refresh.validate()?;
        Ok(())
    }
}

/// Non-empty value of an environment variable
pub(crate) fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse an environment variable, falling back to `default` when unset.
/// A value that is set but unparseable is an error.
pub(crate) fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match env_string(key) {
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

/// Comma separated list, empty entries dropped
pub(crate) fn env_list(key: &str) -> Vec<String> {
    env_string(key)
        .map(|v| {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            jwt: JwtConfig::hs256("test-secret"),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_port_zero_rejected() {
        let mut config = valid_config();
        config.server.port = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_default_rs256_without_keys_rejected() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(ConfigError::Missing(_))));
    }

    #[test]
    fn test_store_backend_parsing() {
        assert_eq!("memory".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert_eq!("Redis".parse::<StoreBackend>(), Ok(StoreBackend::Redis));
        assert_eq!("MYSQL".parse::<StoreBackend>(), Ok(StoreBackend::Mysql));
        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_env_parse_rejects_garbage() {
        std::env::set_var("AUTH_TEST_ENV_PARSE_PORT", "not-a-port");
        let result = env_parse::<u16>("AUTH_TEST_ENV_PARSE_PORT", 8080);
        std::env::remove_var("AUTH_TEST_ENV_PARSE_PORT");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));

        assert_eq!(env_parse::<u16>("AUTH_TEST_ENV_PARSE_UNSET", 8080).unwrap(), 8080);
    }

    #[test]
    fn test_env_list_splits_and_trims() {
        std::env::set_var("AUTH_TEST_ENV_LIST", " https://a.example , ,https://b.example");
        let list = env_list("AUTH_TEST_ENV_LIST");
        std::env::remove_var("AUTH_TEST_ENV_LIST");
        assert_eq!(list, vec!["https://a.example", "https://b.example"]);
    }
}
