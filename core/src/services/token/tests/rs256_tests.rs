//! Unit tests for RS256 access tokens and the published JWK set

use chrono::Duration;
use jsonwebtoken::{decode, decode_header, DecodingKey, Validation, Algorithm};

use crate::domain::entities::Claims;
use crate::errors::{DomainError, TokenError};
use crate::services::token::{AccessTokenIssuer, JwtMaker, Rs256KeyManager};

const PKCS1_KEY: &str = include_str!("fixtures/rs256_pkcs1.pem");
const PKCS8_KEY: &str = include_str!("fixtures/rs256_pkcs8.pem");

fn rs256_maker(pem: &str, kid: &str, lifetime: Duration) -> JwtMaker {
    let keys = Rs256KeyManager::from_private_pem(pem, kid).unwrap();
    JwtMaker::rs256(keys, "auth-service", "api", lifetime)
}

#[test]
fn test_both_pem_encodings_load() {
    assert!(Rs256KeyManager::from_private_pem(PKCS1_KEY, "k1").is_ok());
    assert!(Rs256KeyManager::from_private_pem(PKCS8_KEY, "k2").is_ok());
}

#[test]
fn test_garbage_pem_rejected() {
    let result = Rs256KeyManager::from_private_pem("-----BEGIN NOTHING-----", "k1");
    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::KeyLoad { .. }))
    ));
}

#[test]
fn test_round_trip_sets_kid_iss_aud() {
    let maker = rs256_maker(PKCS1_KEY, "key-2024", Duration::minutes(15));
    let token = maker.create_token("member@example.com").unwrap();

    let header = decode_header(token.as_str()).unwrap();
    assert_eq!(header.alg, Algorithm::RS256);
    assert_eq!(header.kid.as_deref(), Some("key-2024"));

    let claims = maker.verify(token.as_str()).unwrap();
    assert_eq!(claims.sub, "member@example.com");
    assert_eq!(claims.iss.as_deref(), Some("auth-service"));
    assert_eq!(claims.aud.as_deref(), Some("api"));
}

#[test]
fn test_negative_lifetime_is_expired() {
    let maker = rs256_maker(PKCS8_KEY, "k", Duration::seconds(-30));
    let token = maker.create_token("member@example.com").unwrap();
    assert_eq!(
        maker.parse_token(token.as_str()),
        Err(DomainError::Token(TokenError::Expired))
    );
}

#[test]
fn test_other_key_pair_rejects() {
    let signer = rs256_maker(PKCS1_KEY, "k", Duration::minutes(15));
    let verifier = rs256_maker(PKCS8_KEY, "k", Duration::minutes(15));

    let token = signer.create_token("member@example.com").unwrap();
    assert_eq!(
        verifier.parse_token(token.as_str()),
        Err(DomainError::Token(TokenError::Invalid))
    );
}

#[test]
fn test_wrong_audience_rejected() {
    let keys = Rs256KeyManager::from_private_pem(PKCS1_KEY, "k").unwrap();
    let signer = JwtMaker::rs256(keys.clone(), "auth-service", "other-api", Duration::minutes(15));
    let verifier = JwtMaker::rs256(keys, "auth-service", "api", Duration::minutes(15));

    let token = signer.create_token("member@example.com").unwrap();
    assert_eq!(
        verifier.parse_token(token.as_str()),
        Err(DomainError::Token(TokenError::Invalid))
    );
}

#[test]
fn test_jwks_verifies_issued_tokens() {
    let maker = rs256_maker(PKCS1_KEY, "key-2024", Duration::minutes(15));
    let jwks = maker.jwks();
    assert_eq!(jwks.keys.len(), 1);

    let jwk = &jwks.keys[0];
    assert_eq!(jwk.kty, "RSA");
    assert_eq!(jwk.key_use, "sig");
    assert_eq!(jwk.alg, "RS256");
    assert_eq!(jwk.kid, "key-2024");
    assert_eq!(jwk.e, "AQAB");

    // A downstream verifier only has the JWK
    let token = maker.create_token("member@example.com").unwrap();
    let key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e).unwrap();
    let mut validation = Validation::new(Algorithm::RS256);
    validation.set_issuer(&["auth-service"]);
    validation.set_audience(&["api"]);
    let data = decode::<Claims>(token.as_str(), &key, &validation).unwrap();
    assert_eq!(data.claims.sub, "member@example.com");
}

#[test]
fn test_jwk_serializes_use_field() {
    let maker = rs256_maker(PKCS8_KEY, "k", Duration::minutes(15));
    let json = serde_json::to_value(maker.jwks()).unwrap();
    assert_eq!(json["keys"][0]["use"], "sig");
    assert!(json["keys"][0].get("key_use").is_none());
}
