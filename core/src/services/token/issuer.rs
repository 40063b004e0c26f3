//! Seams between the login flow and the token makers.

use crate::domain::entities::{AccessToken, RefreshToken};
use crate::errors::DomainError;

/// Issues and verifies signed, expiring bearer tokens bound to a subject
pub trait AccessTokenIssuer: Send + Sync {
    /// Sign a claim set for `subject` expiring after the configured lifetime
    fn create_token(&self, subject: &str) -> Result<AccessToken, DomainError>;

    /// Verify signature and expiry, returning the subject
    ///
    /// A signed claim set without a subject yields an empty string.
    fn parse_token(&self, token: &str) -> Result<String, DomainError>;
}

/// Produces opaque refresh tokens and describes how they are delivered
pub trait RefreshTokenIssuer: Send + Sync {
    fn create_token(&self) -> Result<RefreshToken, DomainError>;

    /// Session lifetime in seconds
    fn max_age(&self) -> i64;

    /// Path under `/v1/` the refresh cookie is scoped to
    fn refresh_endpoint(&self) -> &str;
}
