//! Redis client used by the refresh session store
//!
//! Connecting is retried with exponential backoff at startup. Individual
//! commands are never retried: each one is bounded by the configured
//! response timeout and its error is handed straight back to the caller.

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use auth_shared::CacheConfig;

use crate::{bounded, InfrastructureError};

/// Base delay before the second connection attempt
const CONNECT_RETRY_DELAY_MS: u64 = 100;
/// Backoff ceiling between connection attempts
const CONNECT_RETRY_CAP_MS: u64 = 5000;

/// Redis client over a multiplexed connection
///
/// Cheap to clone; clones share the underlying connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
    /// Upper bound for every command round-trip
    response_timeout: Duration,
}

impl RedisClient {
    /// Connect using `config`, retrying up to `config.connect_attempts` times
    ///
    /// # Example
    /// ```no_run
    /// use auth_infra::cache::RedisClient;
    /// use auth_shared::CacheConfig;
    ///
    /// async fn connect() -> Result<RedisClient, auth_infra::InfrastructureError> {
    ///     RedisClient::new(CacheConfig::new("redis://localhost:6379")).await
    /// }
    /// ```
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(url = %mask_url(&config.url), "creating Redis client");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection = Self::connect_with_retry(
            &client,
            config.connect_attempts.max(1),
            Duration::from_secs(config.connection_timeout),
        )
        .await?;

        info!("Redis client created successfully");

        Ok(Self {
            connection,
            response_timeout: Duration::from_secs(config.response_timeout),
            config,
        })
    }

    async fn connect_with_retry(
        client: &Client,
        max_attempts: u32,
        attempt_timeout: Duration,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let mut attempts = 0;
        let mut delay = CONNECT_RETRY_DELAY_MS;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match bounded(attempt_timeout, client.get_multiplexed_async_connection()).await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_attempts && is_retriable(&e) => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_attempts, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(CONNECT_RETRY_CAP_MS);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(e);
                }
            }
        }
    }

    /// Prefix `key` with the configured namespace
    pub fn make_key(&self, key: &str) -> String {
        self.config.make_key(key)
    }

    /// `SET key value NX EX ttl`
    ///
    /// Returns `false` without touching the existing value when `key` is
    /// already present.
    pub async fn set_nx_ex(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: u64,
    ) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let reply: Option<String> = bounded(
            self.response_timeout,
            redis::cmd("SET")
                .arg(key)
                .arg(value)
                .arg("NX")
                .arg("EX")
                .arg(ttl_seconds)
                .query_async(&mut conn),
        )
        .await?;

        Ok(reply.is_some())
    }

    /// Get a value, `None` when the key is absent or expired
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let mut conn = self.connection.clone();
        bounded(self.response_timeout, conn.get::<_, Option<String>>(key)).await
    }

    /// Delete a key, returning whether it existed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let deleted: u32 = bounded(self.response_timeout, conn.del(key)).await?;
        Ok(deleted > 0)
    }

    /// Remaining TTL in seconds; `None` if the key is missing or persistent
    pub async fn ttl(&self, key: &str) -> Result<Option<i64>, InfrastructureError> {
        let mut conn = self.connection.clone();
        let ttl: i64 = bounded(self.response_timeout, conn.ttl(key)).await?;
        Ok((ttl >= 0).then_some(ttl))
    }

    /// Performs a PING command to verify connectivity
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let mut conn = self.connection.clone();
        let response: String =
            bounded(self.response_timeout, redis::cmd("PING").query_async(&mut conn)).await?;

        if response == "PONG" {
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }
}

/// Transient failures worth another connection attempt
pub(crate) fn is_retriable(error: &InfrastructureError) -> bool {
    match error {
        InfrastructureError::Timeout(_) => true,
        InfrastructureError::Cache(e) => is_retriable_error(e),
        _ => false,
    }
}

pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Mask credentials in a Redis URL for logging
pub(crate) fn mask_url(url: &str) -> String {
    if let (Some(at_pos), Some(proto_end)) = (url.rfind('@'), url.find("://")) {
        if at_pos > proto_end {
            return format!("{}****{}", &url[..proto_end + 3], &url[at_pos..]);
        }
    }
    url.to_string()
}
