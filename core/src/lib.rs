//! # Auth Core
//!
//! Domain layer of the auth service: entities, error types, token makers,
//! the refresh session storage contract and the login orchestrator.

pub mod domain;
pub mod errors;
pub mod gateways;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{AccessToken, Claims, RefreshToken, RefreshTokenSession, VerifiedUser};
pub use domain::value_objects::{LoginResult, RefreshResult};
pub use errors::{AuthError, DomainError, DomainResult, SessionError, TokenError};
pub use gateways::UserGateway;
pub use repositories::RefreshSessionRepository;
pub use services::{
    AccessTokenIssuer, AuthService, JwkSet, JwtMaker, OpaqueTokenMaker, RefreshTokenIssuer,
    Rs256KeyManager,
};
