//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `auth_core`:
//! - **Cache**: Redis client with connect retry and bounded round-trips
//! - **Database**: MySQL connection pool and migrations using SQLx
//! - **Session**: refresh session stores (in-memory, Redis, MySQL)
//! - **Gateway**: HTTP client for the user service
//!
//! ## Features
//!
//! - `mysql`: Enable the MySQL session store (default)
//! - `redis-cache`: Enable the Redis session store (default)

use auth_core::errors::{DomainError, SessionError};

/// Cache module - Redis client
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Database module - MySQL pool using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Outbound gateways to other services
pub mod gateway;

/// Refresh session store implementations
pub mod session;

#[cfg(feature = "redis-cache")]
pub use cache::RedisClient;
#[cfg(feature = "mysql")]
pub use database::DatabasePool;
pub use gateway::HttpUserGateway;
pub use session::MemoryRefreshSessionRepository;
#[cfg(feature = "mysql")]
pub use session::MySqlRefreshSessionRepository;
#[cfg(feature = "redis-cache")]
pub use session::RedisRefreshSessionRepository;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stored record could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A round-trip exceeded its deadline
    #[error("Operation timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Timeout(_) => SessionError::Timeout.into(),
            InfrastructureError::Config(message) => DomainError::Internal { message },
            other => SessionError::Storage {
                message: other.to_string(),
            }
            .into(),
        }
    }
}

/// Run `fut` under `limit`, turning an elapsed deadline into
/// [`InfrastructureError::Timeout`]
pub(crate) async fn bounded<F, T, E>(
    limit: std::time::Duration,
    fut: F,
) -> Result<T, InfrastructureError>
where
    F: std::future::Future<Output = Result<T, E>>,
    E: Into<InfrastructureError>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result.map_err(Into::into),
        Err(_) => Err(InfrastructureError::Timeout(limit)),
    }
}
