//! Token entities for JWT access tokens and opaque refresh tokens.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoded, signed JWT handed to clients as a bearer credential
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

/// Opaque URL-safe refresh token; its value is the session store key
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshToken(String);

macro_rules! token_newtype {
    ($name:ident) => {
        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }

            /// First characters only, for log lines
            pub fn masked(&self) -> String {
                let prefix: String = self.0.chars().take(6).collect();
                format!("{}…", prefix)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.masked()).finish()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

token_newtype!(AccessToken);
token_newtype!(RefreshToken);

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (member id). Missing on the wire parses as empty.
    #[serde(default)]
    pub sub: String,

    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    #[serde(default)]
    pub nbf: i64,

    /// JWT ID
    #[serde(default)]
    pub jti: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_is_masked() {
        let token = RefreshToken::new("abcdefghijklmnop");
        let rendered = format!("{:?}", token);
        assert!(rendered.contains("abcdef"));
        assert!(!rendered.contains("ghijkl"));
    }

    #[test]
    fn test_tokens_serialize_as_plain_strings() {
        let token = AccessToken::new("header.payload.sig");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"header.payload.sig\"");
    }

    #[test]
    fn test_claims_without_subject_parse_empty() {
        let claims: Claims = serde_json::from_str(r#"{"exp":2}"#).unwrap();
        assert_eq!(claims.sub, "");
        assert!(claims.iss.is_none());
    }
}
