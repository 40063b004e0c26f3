//! Shared fixtures for the HTTP integration tests
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::web;
use async_trait::async_trait;
use chrono::Duration;

use auth_api::{AppState, HttpSettings};
use auth_core::{
    AuthError, AuthService, DomainError, JwtMaker, OpaqueTokenMaker, RefreshSessionRepository,
    RefreshTokenSession, SessionError, UserGateway, VerifiedUser,
};
use auth_infra::MemoryRefreshSessionRepository;
use auth_shared::{CorsConfig, Environment};

pub const EMAIL: &str = "member@example.com";
pub const PASSWORD: &str = "correct horse battery staple";
/// Makes the stub user service fail as if it were unreachable
pub const OUTAGE_EMAIL: &str = "outage@example.com";
pub const SECRET: &str = "integration-test-secret";
pub const MAX_AGE: i64 = 604_800;

/// Accepts exactly one email/password pair
pub struct StubUsers;

#[async_trait]
impl UserGateway for StubUsers {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<VerifiedUser, DomainError> {
        if email == OUTAGE_EMAIL {
            return Err(AuthError::UserServiceUnavailable {
                message: "user verify: connection refused to users.internal:8081".to_string(),
            }
            .into());
        }
        if email == EMAIL && password == PASSWORD {
            return Ok(VerifiedUser {
                id: "6d7f3a1e-2b44-4c1b-9d0e-51a1f7c2b8aa".to_string(),
                email: EMAIL.to_string(),
                status: "active".to_string(),
            });
        }
        Err(AuthError::InvalidCredentials.into())
    }
}

/// Session store whose backend is unreachable
pub struct DownStore;

#[async_trait]
impl RefreshSessionRepository for DownStore {
    async fn save(&self, _session: &RefreshTokenSession) -> Result<(), DomainError> {
        Err(SessionError::Timeout.into())
    }

    async fn get_by_token(&self, _token: &str) -> Result<RefreshTokenSession, DomainError> {
        Err(SessionError::Timeout.into())
    }

    async fn ping(&self) -> Result<(), DomainError> {
        Err(SessionError::Storage {
            message: "connection refused".to_string(),
        }
        .into())
    }
}

pub fn jwt_maker() -> JwtMaker {
    JwtMaker::hs256(SECRET, Duration::minutes(15)).unwrap()
}

pub type TestState<R> = AppState<JwtMaker, OpaqueTokenMaker, R, StubUsers>;

pub fn state_with_endpoint<R>(
    sessions: Arc<R>,
    environment: Environment,
    endpoint: &str,
) -> web::Data<TestState<R>>
where
    R: RefreshSessionRepository + 'static,
{
    let jwt = jwt_maker();
    let jwks = jwt.jwks().clone();
    let service = AuthService::new(
        Arc::new(jwt),
        Arc::new(OpaqueTokenMaker::new(32, MAX_AGE, endpoint).unwrap()),
        sessions,
        Arc::new(StubUsers),
    );
    web::Data::new(AppState::new(Arc::new(service), jwks, environment))
}

pub fn state<R>(sessions: Arc<R>, environment: Environment) -> web::Data<TestState<R>>
where
    R: RefreshSessionRepository + 'static,
{
    state_with_endpoint(sessions, environment, "auth/refresh")
}

pub fn memory_store() -> Arc<MemoryRefreshSessionRepository> {
    Arc::new(MemoryRefreshSessionRepository::new())
}

pub fn settings(environment: Environment) -> HttpSettings {
    HttpSettings {
        environment,
        cors: CorsConfig::default(),
        jwks_path: "/.well-known/jwks.json".to_string(),
    }
}

pub fn credentials(email: &str, password: &str) -> serde_json::Value {
    serde_json::json!({ "email": email, "password": password })
}
