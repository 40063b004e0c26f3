//! Shared configuration and response types for the auth service
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and environment loading
//! - The error response body

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, CacheConfig, ConfigError, CorsConfig, DatabaseConfig, Environment, JwtAlgorithm,
    JwtConfig, LogFormat, LoggingConfig, RefreshTokenConfig, ServerConfig, StoreBackend,
    UserServiceConfig,
};
pub use errors::{error_codes, ErrorResponse};
