//! Refresh session repository trait defining the storage contract.

use async_trait::async_trait;

use crate::domain::entities::RefreshTokenSession;
use crate::errors::DomainError;

/// Storage for refresh sessions, keyed by the refresh token value
///
/// Implementations must keep at most one record per `token_hash`, retain each
/// record for `max(expires_at - now, 1 minute)` and then let it lapse
/// passively. No operation is retried internally.
#[async_trait]
pub trait RefreshSessionRepository: Send + Sync {
    /// Persist a new session
    ///
    /// # Returns
    /// * `Ok(())` - The store acknowledged the write
    /// * `Err(SessionError::AlreadyExists)` - A live record exists for the
    ///   same token; it is left untouched
    /// * `Err(DomainError)` - Storage failure or timeout
    async fn save(&self, session: &RefreshTokenSession) -> Result<(), DomainError>;

    /// Look up a session by the presented refresh token
    ///
    /// # Returns
    /// * `Ok(RefreshTokenSession)` - Session found
    /// * `Err(SessionError::NotFound)` - Never saved, or retention lapsed
    /// * `Err(DomainError)` - Storage failure or timeout
    async fn get_by_token(&self, token: &str) -> Result<RefreshTokenSession, DomainError>;

    /// Backend liveness probe used by the health endpoint
    async fn ping(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
