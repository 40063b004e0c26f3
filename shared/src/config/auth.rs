//! Authentication configuration: access token signing, refresh sessions
//! and the user service the credentials are checked against.

use serde::{Deserialize, Serialize};

use super::{env_parse, env_string, ConfigError};

/// Signing algorithm for access tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum JwtAlgorithm {
    /// Shared secret
    HS256,
    /// RSA private key, public half published as JWKS
    RS256,
}

impl std::str::FromStr for JwtAlgorithm {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "HS256" => Ok(JwtAlgorithm::HS256),
            "RS256" => Ok(JwtAlgorithm::RS256),
            _ => Err(()),
        }
    }
}

/// Access token configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    pub algorithm: JwtAlgorithm,

    /// HS256 secret
    #[serde(default)]
    pub secret: String,

    /// RS256 private key (PKCS#1 or PKCS#8 PEM)
    #[serde(default)]
    pub private_key_pem: String,

    /// `kid` header value
    #[serde(default)]
    pub key_id: String,

    #[serde(default)]
    pub issuer: String,

    #[serde(default)]
    pub audience: String,

    /// Access token lifetime in minutes
    pub expire_minutes: i64,

    /// Route serving the JWK set
    #[serde(default = "default_jwks_path")]
    pub jwks_path: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expire_minutes", &self.expire_minutes)
            .field("jwks_path", &self.jwks_path)
            .finish_non_exhaustive()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            algorithm: JwtAlgorithm::RS256,
            secret: String::new(),
            private_key_pem: String::new(),
            key_id: String::new(),
            issuer: String::new(),
            audience: String::new(),
            expire_minutes: 15,
            jwks_path: default_jwks_path(),
        }
    }
}

impl JwtConfig {
    /// HS256 configuration with the given secret
    pub fn hs256(secret: impl Into<String>) -> Self {
        Self {
            algorithm: JwtAlgorithm::HS256,
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Load from `AUTH_JWT_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let algorithm = match env_string("AUTH_JWT_ALGORITHM") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                key: "AUTH_JWT_ALGORITHM".to_string(),
                value,
            })?,
            None => defaults.algorithm,
        };

        Ok(Self {
            algorithm,
            secret: env_string("AUTH_JWT_SECRET").unwrap_or_default(),
            // Single-line env files carry the PEM with literal "\n" separators
            private_key_pem: env_string("AUTH_JWT_PRIVATE_KEY_PEM")
                .map(|pem| pem.replace("\\n", "\n"))
                .unwrap_or_default(),
            key_id: env_string("AUTH_JWT_KEY_ID").unwrap_or_default(),
            issuer: env_string("AUTH_JWT_ISSUER").unwrap_or_default(),
            audience: env_string("AUTH_JWT_AUDIENCE").unwrap_or_default(),
            expire_minutes: env_parse("AUTH_JWT_EXPIRE", defaults.expire_minutes)?,
            jwks_path: env_string("AUTH_JWT_JWKS_PATH").unwrap_or(defaults.jwks_path),
        })
    }

    /// Access token lifetime in seconds
    pub fn expire_seconds(&self) -> i64 {
        self.expire_minutes * 60
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.algorithm {
            JwtAlgorithm::HS256 => {
                if self.secret.is_empty() {
                    return Err(ConfigError::Missing("AUTH_JWT_SECRET".to_string()));
                }
            }
            JwtAlgorithm::RS256 => {
                let required = [
                    ("AUTH_JWT_PRIVATE_KEY_PEM", &self.private_key_pem),
                    ("AUTH_JWT_KEY_ID", &self.key_id),
                    ("AUTH_JWT_ISSUER", &self.issuer),
                    ("AUTH_JWT_AUDIENCE", &self.audience),
                ];
                if let Some((key, _)) = required.iter().find(|(_, value)| value.is_empty()) {
                    return Err(ConfigError::Missing(key.to_string()));
                }
            }
        }
        Ok(())
    }
}

/// Largest `num_bytes` whose unpadded base64 form fits the 255-char token column
pub const MAX_REFRESH_NUM_BYTES: usize = 191;

/// Opaque refresh token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefreshTokenConfig {
    /// Random bytes per token before encoding
    pub num_bytes: usize,

    /// Session lifetime in seconds, also the cookie Max-Age
    pub max_age: i64,

    /// Endpoint path under `/v1/` that receives the refresh cookie
    pub end_point: String,
}

impl Default for RefreshTokenConfig {
    fn default() -> Self {
        Self {
            num_bytes: 32,
            max_age: 7 * 24 * 60 * 60,
            end_point: String::from("auth/refresh"),
        }
    }
}

impl RefreshTokenConfig {
    /// Load from `AUTH_REFRESH_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            num_bytes: env_parse("AUTH_REFRESH_NUM_BYTES", defaults.num_bytes)?,
            max_age: env_parse("AUTH_REFRESH_MAX_AGE", defaults.max_age)?,
            end_point: env_string("AUTH_REFRESH_END_POINT")
                .map(|p| p.trim_matches('/').to_string())
                .unwrap_or(defaults.end_point),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_bytes == 0 {
            return Err(ConfigError::Validation(
                "AUTH_REFRESH_NUM_BYTES must be at least 1".to_string(),
            ));
        }
        if self.num_bytes > MAX_REFRESH_NUM_BYTES {
            return Err(ConfigError::Validation(format!(
                "AUTH_REFRESH_NUM_BYTES must be at most {}",
                MAX_REFRESH_NUM_BYTES
            )));
        }
        if self.max_age <= 0 {
            return Err(ConfigError::Validation(
                "AUTH_REFRESH_MAX_AGE must be positive".to_string(),
            ));
        }
        if self.end_point.is_empty() {
            return Err(ConfigError::Missing("AUTH_REFRESH_END_POINT".to_string()));
        }
        Ok(())
    }
}

/// User service client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserServiceConfig {
    /// Base URL of the user service
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            base_url: String::from("http://127.0.0.1:8081"),
            timeout: 2,
        }
    }
}

impl UserServiceConfig {
    /// Load from `USER_SERVICE_URL` and `USER_SERVICE_TIMEOUT`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            base_url: env_string("USER_SERVICE_URL").unwrap_or(defaults.base_url),
            timeout: env_parse("USER_SERVICE_TIMEOUT", defaults.timeout)?,
        })
    }
}

fn default_jwks_path() -> String {
    String::from("/.well-known/jwks.json")
}
