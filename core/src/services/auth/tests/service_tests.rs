//! Unit tests for the login orchestrator and the refresh exchange

use chrono::Duration;
use std::sync::Arc;

use crate::domain::entities::{RefreshToken, RefreshTokenSession};
use crate::errors::{AuthError, DomainError, SessionError, TokenError};
use crate::repositories::{MockSessionRepository, RefreshSessionRepository};
use crate::services::auth::AuthService;
use crate::services::token::AccessTokenIssuer;

use super::mocks::*;

#[tokio::test]
async fn test_login_success() {
    let (service, sessions, users) = create_service();

    let result = service
        .login(EMAIL, PASSWORD, "agent-X", "1.2.3.4")
        .await
        .unwrap();

    assert_eq!(result.refresh_max_age_secs, MAX_AGE);
    assert_eq!(result.refresh_endpoint, ENDPOINT);
    assert_eq!(*users.calls.lock().unwrap(), 1);

    // Access token is bound to the verified subject
    let subject = jwt_maker().parse_token(result.access_token.as_str()).unwrap();
    assert_eq!(subject, EMAIL);

    // Session is retrievable by the refresh token handed to the client
    let session = sessions
        .get_by_token(result.refresh_token.as_str())
        .await
        .unwrap();
    assert_eq!(session.member_id, EMAIL);
    assert_eq!(session.token_hash, result.refresh_token.as_str());
    assert_eq!(session.user_agent, "agent-X");
    assert_eq!(session.ip_address, "1.2.3.4");
    assert!(session.revoked_at.is_none());

    let lifetime = session.expires_at - session.created_at;
    assert!((lifetime - Duration::seconds(MAX_AGE)).num_seconds().abs() <= 1);
}

#[tokio::test]
async fn test_each_login_opens_a_new_session() {
    let (service, sessions, _) = create_service();

    let first = service.login(EMAIL, PASSWORD, "a", "1.1.1.1").await.unwrap();
    let second = service.login(EMAIL, PASSWORD, "a", "1.1.1.1").await.unwrap();

    assert_ne!(first.refresh_token, second.refresh_token);
    assert_eq!(sessions.len(), 2);
}

#[tokio::test]
async fn test_invalid_credentials_leave_store_unchanged() {
    let (service, sessions, _) = create_service();

    let result = service.login(EMAIL, "wrong", "agent-X", "1.2.3.4").await;

    assert_eq!(result, Err(DomainError::Auth(AuthError::InvalidCredentials)));
    assert_eq!(sessions.len(), 0);
    assert_eq!(sessions.save_calls(), 0);
}

#[tokio::test]
async fn test_verifier_outage_is_returned_verbatim() {
    let sessions = MockSessionRepository::new();
    let service = AuthService::new(
        Arc::new(jwt_maker()),
        Arc::new(opaque_maker()),
        Arc::new(sessions.clone()),
        Arc::new(StubUserGateway::unavailable()),
    );

    let result = service.login(EMAIL, PASSWORD, "agent-X", "1.2.3.4").await;

    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserServiceUnavailable { .. }))
    ));
    assert_eq!(sessions.save_calls(), 0);
}

#[tokio::test]
async fn test_signing_failure_persists_nothing() {
    let sessions = MockSessionRepository::new();
    let service = AuthService::new(
        Arc::new(BrokenSigner),
        Arc::new(opaque_maker()),
        Arc::new(sessions.clone()),
        Arc::new(StubUserGateway::new()),
    );

    let result = service.login(EMAIL, PASSWORD, "agent-X", "1.2.3.4").await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::Signing { .. }))
    ));
    assert_eq!(sessions.save_calls(), 0);
}

#[tokio::test]
async fn test_entropy_failure_persists_nothing() {
    let sessions = MockSessionRepository::new();
    let service = AuthService::new(
        Arc::new(jwt_maker()),
        Arc::new(DrainedEntropy),
        Arc::new(sessions.clone()),
        Arc::new(StubUserGateway::new()),
    );

    let result = service.login(EMAIL, PASSWORD, "agent-X", "1.2.3.4").await;

    assert!(matches!(
        result,
        Err(DomainError::Token(TokenError::RandomSource { .. }))
    ));
    assert_eq!(sessions.save_calls(), 0);
}

#[tokio::test]
async fn test_duplicate_token_fails_login_and_keeps_first_session() {
    let sessions = MockSessionRepository::new();
    let service = AuthService::new(
        Arc::new(jwt_maker()),
        Arc::new(FixedRefreshToken("same-token")),
        Arc::new(sessions.clone()),
        Arc::new(StubUserGateway::new()),
    );

    service.login(EMAIL, PASSWORD, "first-agent", "1.1.1.1").await.unwrap();
    let second = service.login(EMAIL, PASSWORD, "second-agent", "2.2.2.2").await;

    assert_eq!(second, Err(DomainError::Session(SessionError::AlreadyExists)));
    let stored = sessions.get_by_token("same-token").await.unwrap();
    assert_eq!(stored.user_agent, "first-agent");
    assert_eq!(sessions.len(), 1);
}

#[tokio::test]
async fn test_store_failure_is_returned_without_retry() {
    let (service, sessions, _) = create_service();
    sessions.fail_saves_with(DomainError::Session(SessionError::Timeout));

    let result = service.login(EMAIL, PASSWORD, "agent-X", "1.2.3.4").await;

    assert_eq!(result, Err(DomainError::Session(SessionError::Timeout)));
    assert_eq!(sessions.save_calls(), 1);
    assert_eq!(sessions.len(), 0);
}

#[tokio::test]
async fn test_refresh_issues_access_token_for_session_owner() {
    let (service, _, _) = create_service();
    let login = service.login(EMAIL, PASSWORD, "agent-X", "1.2.3.4").await.unwrap();

    let refreshed = service.refresh(login.refresh_token.as_str()).await.unwrap();

    assert_eq!(refreshed.member_id, EMAIL);
    assert_eq!(
        service.parse_access_token(refreshed.access_token.as_str()).unwrap(),
        EMAIL
    );
}

#[tokio::test]
async fn test_refresh_unknown_token_not_found() {
    let (service, _, _) = create_service();
    assert_eq!(
        service.refresh("never-issued").await,
        Err(DomainError::Session(SessionError::NotFound))
    );
}

#[tokio::test]
async fn test_refresh_empty_token_invalid() {
    let (service, sessions, _) = create_service();
    assert_eq!(
        service.refresh("").await,
        Err(DomainError::Token(TokenError::Invalid))
    );
    assert_eq!(sessions.len(), 0);
}

#[tokio::test]
async fn test_refresh_rejects_expired_session_still_in_store() {
    let (service, sessions, _) = create_service();
    sessions.insert(RefreshTokenSession::new(
        EMAIL,
        &RefreshToken::new("lingering"),
        Duration::seconds(-10),
        "agent-X",
        "1.2.3.4",
    ));

    assert_eq!(
        service.refresh("lingering").await,
        Err(DomainError::Token(TokenError::RefreshTokenExpired))
    );
}

#[tokio::test]
async fn test_refresh_rejects_revoked_session() {
    let (service, sessions, _) = create_service();
    let mut session = RefreshTokenSession::new(
        EMAIL,
        &RefreshToken::new("revoked"),
        Duration::hours(1),
        "agent-X",
        "1.2.3.4",
    );
    session.revoked_at = Some(chrono::Utc::now());
    sessions.insert(session);

    assert_eq!(
        service.refresh("revoked").await,
        Err(DomainError::Token(TokenError::Revoked))
    );
}

#[tokio::test]
async fn test_accessors_reflect_refresh_issuer() {
    let (service, _, _) = create_service();
    assert_eq!(service.refresh_max_age(), MAX_AGE);
    assert_eq!(service.refresh_endpoint(), ENDPOINT);
    assert!(service.check_store().await.is_ok());
}
