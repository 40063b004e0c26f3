//! Error types for authentication, token handling and session storage

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User service unavailable: {message}")]
    UserServiceUnavailable { message: String },
}

/// Token issuance and verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The OS entropy source could not supply bytes
    #[error("Random source failure: {message}")]
    RandomSource { message: String },

    #[error("Token signing failed: {message}")]
    Signing { message: String },

    /// Bad signature, malformed structure, wrong issuer or audience
    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Refresh token revoked")]
    Revoked,

    #[error("Key load failed: {message}")]
    KeyLoad { message: String },
}

/// Refresh session store errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("refresh token already exists")]
    AlreadyExists,

    #[error("refresh token not found")]
    NotFound,

    #[error("Session storage failure: {message}")]
    Storage { message: String },

    #[error("Session storage timed out")]
    Timeout,
}
