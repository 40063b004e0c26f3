//! JWT access token maker

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::{AccessToken, Claims};
use crate::errors::{DomainError, TokenError};

use super::issuer::AccessTokenIssuer;
use super::key_manager::{JwkSet, Rs256KeyManager};

/// Signs and verifies access tokens with either a shared secret (HS256) or
/// an RSA key pair (RS256, with `kid`, `iss` and `aud`)
pub struct JwtMaker {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: Duration,
    key_id: Option<String>,
    issuer: Option<String>,
    audience: Option<String>,
    jwks: JwkSet,
}

impl std::fmt::Debug for JwtMaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtMaker")
            .field("algorithm", &self.algorithm)
            .field("lifetime", &self.lifetime)
            .field("key_id", &self.key_id)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl JwtMaker {
    /// Symmetric signing with a shared secret
    ///
    /// `lifetime` may be zero or negative, in which case every token is born
    /// expired.
    pub fn hs256(secret: &str, lifetime: Duration) -> Result<Self, DomainError> {
        if secret.is_empty() {
            return Err(DomainError::Token(TokenError::KeyLoad {
                message: "HS256 secret must not be empty".to_string(),
            }));
        }

        Ok(Self {
            algorithm: Algorithm::HS256,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: strict_validation(Algorithm::HS256),
            lifetime,
            key_id: None,
            issuer: None,
            audience: None,
            jwks: JwkSet::default(),
        })
    }

    /// Asymmetric signing; the public key is published through [`JwtMaker::jwks`]
    pub fn rs256(
        key_manager: Rs256KeyManager,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        lifetime: Duration,
    ) -> Self {
        let issuer = issuer.into();
        let audience = audience.into();

        let mut validation = strict_validation(Algorithm::RS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_audience(&[audience.as_str()]);

        Self {
            algorithm: Algorithm::RS256,
            encoding_key: key_manager.encoding_key().clone(),
            decoding_key: key_manager.decoding_key().clone(),
            validation,
            lifetime,
            key_id: Some(key_manager.key_id().to_string()),
            issuer: Some(issuer),
            audience: Some(audience),
            jwks: JwkSet {
                keys: vec![key_manager.jwk().clone()],
            },
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Public keys for verifiers; empty for HS256
    pub fn jwks(&self) -> &JwkSet {
        &self.jwks
    }

    /// Verify a token and return its full claim set
    pub fn verify(&self, token: &str) -> Result<Claims, DomainError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => DomainError::Token(TokenError::Expired),
                _ => {
                    tracing::debug!(error = %e, "access token rejected");
                    DomainError::Token(TokenError::Invalid)
                }
            }
        })?;

        // The library only rejects `exp < now`; a token is already dead at `exp == now`
        if data.claims.exp <= Utc::now().timestamp() {
            return Err(DomainError::Token(TokenError::Expired));
        }

        Ok(data.claims)
    }
}

impl AccessTokenIssuer for JwtMaker {
    fn create_token(&self, subject: &str) -> Result<AccessToken, DomainError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.lifetime).timestamp(),
            nbf: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let mut header = Header::new(self.algorithm);
        header.kid = self.key_id.clone();

        encode(&header, &claims, &self.encoding_key)
            .map(AccessToken::new)
            .map_err(|e| {
                DomainError::Token(TokenError::Signing {
                    message: e.to_string(),
                })
            })
    }

    fn parse_token(&self, token: &str) -> Result<String, DomainError> {
        self.verify(token).map(|claims| claims.sub)
    }
}

fn strict_validation(algorithm: Algorithm) -> Validation {
    let mut validation = Validation::new(algorithm);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.validate_nbf = true;
    validation
}
