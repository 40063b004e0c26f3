//! Redis refresh session store.
//!
//! Each session is a JSON value under `refresh_token:<token>` whose TTL is
//! the session's remaining lifetime, never less than one minute.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, warn};

use auth_core::errors::{DomainError, SessionError};
use auth_core::{RefreshSessionRepository, RefreshToken, RefreshTokenSession};

use crate::cache::RedisClient;
use crate::InfrastructureError;

pub struct RedisRefreshSessionRepository {
    client: RedisClient,
}

impl RedisRefreshSessionRepository {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RefreshSessionRepository for RedisRefreshSessionRepository {
    async fn save(&self, session: &RefreshTokenSession) -> Result<(), DomainError> {
        let key = self.client.make_key(&session.token_hash);
        let value = serde_json::to_string(session).map_err(InfrastructureError::from)?;
        let ttl = session.retention_ttl(Utc::now());

        let written = self
            .client
            .set_nx_ex(&key, &value, ttl.as_secs())
            .await
            .map_err(|e| {
                error!(session_id = %session.id, error = %e, "failed to write refresh session");
                e
            })?;

        if !written {
            warn!(session_id = %session.id, "refresh token collision, record left untouched");
            return Err(SessionError::AlreadyExists.into());
        }

        debug!(session_id = %session.id, ttl_secs = ttl.as_secs(), "refresh session stored in Redis");
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<RefreshTokenSession, DomainError> {
        let key = self.client.make_key(token);
        let value = self.client.get(&key).await?.ok_or_else(|| {
            debug!(token = %RefreshToken::new(token).masked(), "refresh session not found");
            DomainError::from(SessionError::NotFound)
        })?;

        let session = serde_json::from_str(&value).map_err(|e| {
            error!(error = %e, "stored refresh session is not valid JSON");
            InfrastructureError::from(e)
        })?;
        Ok(session)
    }

    async fn ping(&self) -> Result<(), DomainError> {
        if self.client.health_check().await? {
            Ok(())
        } else {
            Err(SessionError::Storage {
                message: "unexpected PING reply".to_string(),
            }
            .into())
        }
    }
}
