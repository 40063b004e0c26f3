//! Credential verification against the user service.

use async_trait::async_trait;

use crate::domain::entities::VerifiedUser;
use crate::errors::DomainError;

/// Resolves an email/password pair to a user
///
/// # Returns
/// * `Ok(VerifiedUser)` - Credentials accepted
/// * `Err(AuthError::InvalidCredentials)` - Unknown user or wrong password
/// * `Err(AuthError::UserServiceUnavailable)` - The verifier could not answer
#[async_trait]
pub trait UserGateway: Send + Sync {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<VerifiedUser, DomainError>;
}
