//! Login orchestration: credentials in, access token plus refresh session out

use chrono::Duration;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::domain::entities::RefreshTokenSession;
use crate::domain::value_objects::{LoginResult, RefreshResult};
use crate::errors::{DomainError, TokenError};
use crate::gateways::UserGateway;
use crate::repositories::RefreshSessionRepository;
use crate::services::token::{AccessTokenIssuer, RefreshTokenIssuer};

use super::masking::mask_email;

/// Authentication service composing the token makers, the session store and
/// the credential verifier
///
/// All collaborators are injected; the service holds no state of its own.
pub struct AuthService<A, T, R, U>
where
    A: AccessTokenIssuer,
    T: RefreshTokenIssuer,
    R: RefreshSessionRepository,
    U: UserGateway,
{
    /// Signs access tokens
    access_tokens: Arc<A>,
    /// Generates opaque refresh tokens
    refresh_tokens: Arc<T>,
    /// Persists refresh sessions
    sessions: Arc<R>,
    /// Verifies email/password pairs
    users: Arc<U>,
}

impl<A, T, R, U> AuthService<A, T, R, U>
where
    A: AccessTokenIssuer,
    T: RefreshTokenIssuer,
    R: RefreshSessionRepository,
    U: UserGateway,
{
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `access_tokens` - Access token issuer
    /// * `refresh_tokens` - Refresh token generator
    /// * `sessions` - Refresh session store
    /// * `users` - Credential verifier
    pub fn new(
        access_tokens: Arc<A>,
        refresh_tokens: Arc<T>,
        sessions: Arc<R>,
        users: Arc<U>,
    ) -> Self {
        Self {
            access_tokens,
            refresh_tokens,
            sessions,
            users,
        }
    }

    /// Authenticate a user and open a refresh session
    ///
    /// Each step short-circuits with the first error, returned unchanged. The
    /// session is the last thing written, so no failure leaves one behind.
    ///
    /// # Arguments
    ///
    /// * `email` - Login identifier
    /// * `password` - Plaintext password, forwarded to the verifier only
    /// * `user_agent` - Caller's user agent, recorded on the session
    /// * `ip_address` - Caller's address, recorded on the session
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        user_agent: &str,
        ip_address: &str,
    ) -> Result<LoginResult, DomainError> {
        let masked = mask_email(email);

        let user = self
            .users
            .verify_credentials(email, password)
            .await
            .map_err(|e| {
                warn!(email = %masked, error = %e, "credential verification failed");
                e
            })?;
        let subject = user.subject();

        let access_token = self.access_tokens.create_token(subject)?;
        let refresh_token = self.refresh_tokens.create_token()?;

        let max_age = self.refresh_tokens.max_age();
        let session = RefreshTokenSession::new(
            subject,
            &refresh_token,
            Duration::seconds(max_age),
            user_agent,
            ip_address,
        );

        self.sessions.save(&session).await.map_err(|e| {
            warn!(email = %masked, session_id = %session.id, error = %e, "failed to store refresh session");
            e
        })?;

        info!(
            email = %masked,
            session_id = %session.id,
            expires_at = %session.expires_at,
            "login succeeded"
        );

        Ok(LoginResult {
            access_token,
            refresh_token,
            refresh_max_age_secs: max_age,
            refresh_endpoint: self.refresh_tokens.refresh_endpoint().to_string(),
        })
    }

    /// Exchange a refresh token for a new access token
    ///
    /// The refresh token is not rotated and the session is left as stored.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResult, DomainError> {
        if refresh_token.is_empty() {
            return Err(TokenError::Invalid.into());
        }

        let session = self.sessions.get_by_token(refresh_token).await?;

        if session.is_revoked() {
            warn!(session_id = %session.id, "revoked refresh token presented");
            return Err(TokenError::Revoked.into());
        }
        // The store may keep a record up to a minute past expiry
        if session.is_expired() {
            debug!(session_id = %session.id, "expired refresh token presented");
            return Err(TokenError::RefreshTokenExpired.into());
        }

        let access_token = self.access_tokens.create_token(&session.member_id)?;

        debug!(session_id = %session.id, "access token refreshed");

        Ok(RefreshResult {
            access_token,
            member_id: session.member_id,
        })
    }

    /// Verify an access token, returning its subject
    pub fn parse_access_token(&self, token: &str) -> Result<String, DomainError> {
        self.access_tokens.parse_token(token)
    }

    /// Probe the session store
    pub async fn check_store(&self) -> Result<(), DomainError> {
        self.sessions.ping().await
    }

    pub fn refresh_max_age(&self) -> i64 {
        self.refresh_tokens.max_age()
    }

    pub fn refresh_endpoint(&self) -> &str {
        self.refresh_tokens.refresh_endpoint()
    }
}
