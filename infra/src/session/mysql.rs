//! MySQL implementation of the RefreshSessionRepository trait.
//!
//! Rows carry a `retain_until` deadline computed like the Redis TTL. Reads
//! ignore rows past it, so expiry stays passive; `purge_expired` reclaims
//! the space.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use std::time::Duration;
use tracing::{debug, error, warn};
use uuid::Uuid;

use auth_core::errors::{DomainError, SessionError};
use auth_core::{RefreshSessionRepository, RefreshTokenSession};

use crate::database::DatabasePool;
use crate::{bounded, InfrastructureError};

/// MySQL implementation of RefreshSessionRepository
pub struct MySqlRefreshSessionRepository {
    pool: MySqlPool,
    query_timeout: Duration,
}

impl MySqlRefreshSessionRepository {
    pub fn new(database: &DatabasePool) -> Self {
        Self {
            pool: database.get_pool().clone(),
            query_timeout: database.query_timeout(),
        }
    }

    /// Delete rows past their retention deadline, returning how many went
    pub async fn purge_expired(&self) -> Result<u64, DomainError> {
        let result = bounded(
            self.query_timeout,
            sqlx::query("DELETE FROM refresh_token_sessions WHERE retain_until <= ?")
                .bind(Utc::now())
                .execute(&self.pool),
        )
        .await?;

        debug!(rows = result.rows_affected(), "purged expired refresh sessions");
        Ok(result.rows_affected())
    }

    fn row_to_session(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenSession, DomainError> {
        let column = |name: &str, e: sqlx::Error| DomainError::Internal {
            message: format!("Failed to get {}: {}", name, e),
        };

        let id: String = row.try_get("id").map_err(|e| column("id", e))?;

        Ok(RefreshTokenSession {
            id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
                message: format!("Invalid session UUID: {}", e),
            })?,
            member_id: row.try_get("member_id").map_err(|e| column("member_id", e))?,
            token_hash: row.try_get("token_hash").map_err(|e| column("token_hash", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| column("expires_at", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| column("created_at", e))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| column("revoked_at", e))?,
            user_agent: row.try_get("user_agent").map_err(|e| column("user_agent", e))?,
            ip_address: row.try_get("ip_address").map_err(|e| column("ip_address", e))?,
        })
    }
}

fn is_duplicate_key(err: &InfrastructureError) -> bool {
    match err {
        InfrastructureError::Database(sqlx::Error::Database(db)) => db.is_unique_violation(),
        _ => false,
    }
}

#[async_trait]
impl RefreshSessionRepository for MySqlRefreshSessionRepository {
    async fn save(&self, session: &RefreshTokenSession) -> Result<(), DomainError> {
        let now = Utc::now();
        let ttl = session.retention_ttl(now);
        let retain_until = now
            + chrono::Duration::from_std(ttl).map_err(|e| DomainError::Internal {
                message: format!("retention window out of range: {}", e),
            })?;

        // A dead row must not block reuse of its token value
        bounded(
            self.query_timeout,
            sqlx::query(
                "DELETE FROM refresh_token_sessions WHERE token_hash = ? AND retain_until <= ?",
            )
            .bind(&session.token_hash)
            .bind(now)
            .execute(&self.pool),
        )
        .await?;

        let query = r#"
            INSERT INTO refresh_token_sessions (
                id, member_id, token_hash, expires_at, created_at,
                revoked_at, user_agent, ip_address, retain_until
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        let inserted = bounded(
            self.query_timeout,
            sqlx::query(query)
                .bind(session.id.to_string())
                .bind(&session.member_id)
                .bind(&session.token_hash)
                .bind(session.expires_at)
                .bind(session.created_at)
                .bind(session.revoked_at)
                .bind(&session.user_agent)
                .bind(&session.ip_address)
                .bind(retain_until)
                .execute(&self.pool),
        )
        .await;

        match inserted {
            Ok(_) => {
                debug!(session_id = %session.id, ttl_secs = ttl.as_secs(), "refresh session stored in MySQL");
                Ok(())
            }
            Err(e) if is_duplicate_key(&e) => {
                warn!(session_id = %session.id, "refresh token collision, row left untouched");
                Err(SessionError::AlreadyExists.into())
            }
            Err(e) => {
                error!(session_id = %session.id, error = %e, "failed to insert refresh session");
                Err(e.into())
            }
        }
    }

    async fn get_by_token(&self, token: &str) -> Result<RefreshTokenSession, DomainError> {
        let query = r#"
            SELECT id, member_id, token_hash, expires_at, created_at,
                   revoked_at, user_agent, ip_address
            FROM refresh_token_sessions
            WHERE token_hash = ? AND retain_until > ?
            LIMIT 1
        "#;

        let row = bounded(
            self.query_timeout,
            sqlx::query(query)
                .bind(token)
                .bind(Utc::now())
                .fetch_optional(&self.pool),
        )
        .await?;

        match row {
            Some(row) => Self::row_to_session(&row),
            None => Err(SessionError::NotFound.into()),
        }
    }

    async fn ping(&self) -> Result<(), DomainError> {
        bounded(
            self.query_timeout,
            sqlx::query("SELECT 1").execute(&self.pool),
        )
        .await?;
        Ok(())
    }
}
