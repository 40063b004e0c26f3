//! Domain-specific error types and error handling.

mod types;

pub use types::{AuthError, SessionError, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl DomainError {
    /// True when the error is the caller's fault rather than the service's
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DomainError::Validation { .. }
                | DomainError::Auth(AuthError::InvalidCredentials)
                | DomainError::Token(
                    TokenError::Invalid
                        | TokenError::Expired
                        | TokenError::RefreshTokenExpired
                        | TokenError::Revoked
                )
                | DomainError::Session(SessionError::NotFound)
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
