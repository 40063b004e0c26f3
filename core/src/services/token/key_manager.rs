//! RS256 key management for JWT signing, verification and JWKS publishing

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use jsonwebtoken::{DecodingKey, EncodingKey};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, TokenError};

/// Public half of a signing key in JWK form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    pub kty: String,
    #[serde(rename = "use")]
    pub key_use: String,
    pub alg: String,
    pub kid: String,
    pub n: String,
    pub e: String,
}

/// Document served at the JWKS endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// Manager for the RS256 key pair used in JWT operations
#[derive(Clone)]
pub struct Rs256KeyManager {
    /// Private key for signing JWTs
    encoding_key: EncodingKey,
    /// Public key for verifying JWTs, rebuilt from the JWK components
    decoding_key: DecodingKey,
    jwk: Jwk,
}

impl std::fmt::Debug for Rs256KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rs256KeyManager")
            .field("kid", &self.jwk.kid)
            .finish_non_exhaustive()
    }
}

impl Rs256KeyManager {
    /// Creates a key manager from a PEM private key
    ///
    /// # Arguments
    ///
    /// * `private_key_pem` - PKCS#1 (`RSA PRIVATE KEY`) or PKCS#8 (`PRIVATE KEY`) PEM
    /// * `key_id` - Value for the `kid` header and JWK
    ///
    /// # Returns
    ///
    /// * `Ok(Rs256KeyManager)` - Key manager initialized successfully
    /// * `Err(DomainError)` - Invalid key format
    pub fn from_private_pem(private_key_pem: &str, key_id: &str) -> Result<Self, DomainError> {
        let private_key = RsaPrivateKey::from_pkcs1_pem(private_key_pem)
            .or_else(|_| RsaPrivateKey::from_pkcs8_pem(private_key_pem))
            .map_err(|e| key_load_error(format!("Invalid private key format: {}", e)))?;
        let public_key = private_key.to_public_key();

        let n = URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be());
        let e = URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be());

        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
            .map_err(|e| key_load_error(format!("Invalid private key format: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_components(&n, &e)
            .map_err(|e| key_load_error(format!("Invalid public key components: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            jwk: Jwk {
                kty: "RSA".to_string(),
                key_use: "sig".to_string(),
                alg: "RS256".to_string(),
                kid: key_id.to_string(),
                n,
                e,
            },
        })
    }

    /// Returns the encoding key for signing JWTs
    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    /// Returns the decoding key for verifying JWTs
    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn key_id(&self) -> &str {
        &self.jwk.kid
    }

    pub fn jwk(&self) -> &Jwk {
        &self.jwk
    }
}

fn key_load_error(message: String) -> DomainError {
    DomainError::Token(TokenError::KeyLoad { message })
}
