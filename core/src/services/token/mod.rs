//! Token makers
//!
//! - JWT access tokens, HS256 or RS256 with a published JWK set
//! - Opaque refresh tokens drawn from the OS entropy source

mod issuer;
mod jwt;
mod key_manager;
mod opaque;

#[cfg(test)]
mod tests;

pub use issuer::{AccessTokenIssuer, RefreshTokenIssuer};
pub use jwt::JwtMaker;
pub use key_manager::{Jwk, JwkSet, Rs256KeyManager};
pub use opaque::OpaqueTokenMaker;
