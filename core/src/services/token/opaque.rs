//! Opaque refresh token generation

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{rngs::OsRng, RngCore};

use crate::domain::entities::RefreshToken;
use crate::errors::{DomainError, TokenError};

use super::issuer::RefreshTokenIssuer;

/// Generates random URL-safe refresh tokens from the OS entropy source
///
/// Uniqueness is not enforced here; collision resistance comes entirely from
/// `num_bytes` of CSPRNG output.
#[derive(Debug, Clone)]
pub struct OpaqueTokenMaker {
    num_bytes: usize,
    max_age: i64,
    refresh_endpoint: String,
}

impl OpaqueTokenMaker {
    /// # Arguments
    ///
    /// * `num_bytes` - Random bytes per token, at least 1
    /// * `max_age` - Session lifetime in seconds
    /// * `refresh_endpoint` - Path under `/v1/` that receives the token
    pub fn new(
        num_bytes: usize,
        max_age: i64,
        refresh_endpoint: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if num_bytes == 0 {
            return Err(DomainError::Validation {
                message: "refresh token length must be at least one byte".to_string(),
            });
        }
        Ok(Self {
            num_bytes,
            max_age,
            refresh_endpoint: refresh_endpoint.into(),
        })
    }

    pub fn num_bytes(&self) -> usize {
        self.num_bytes
    }

    /// Length of every token this maker produces
    pub fn encoded_len(&self) -> usize {
        (self.num_bytes * 4 + 2) / 3
    }
}

impl RefreshTokenIssuer for OpaqueTokenMaker {
    fn create_token(&self) -> Result<RefreshToken, DomainError> {
        let mut bytes = vec![0u8; self.num_bytes];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            tracing::error!(error = %e, "OS entropy source failed");
            TokenError::RandomSource {
                message: e.to_string(),
            }
        })?;
        Ok(RefreshToken::new(URL_SAFE_NO_PAD.encode(bytes)))
    }

    fn max_age(&self) -> i64 {
        self.max_age
    }

    fn refresh_endpoint(&self) -> &str {
        &self.refresh_endpoint
    }
}
