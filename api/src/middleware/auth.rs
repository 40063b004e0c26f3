//! Bearer token extraction for routes that need an authenticated caller.

use actix_web::{
    dev::Payload, error::ErrorUnauthorized, http::header::AUTHORIZATION, Error, FromRequest,
    HttpRequest,
};
use std::future::{ready, Ready};

/// Raw access token from `Authorization: Bearer <token>`
///
/// Only the header shape is checked here; the signature is verified by the
/// handler through the auth service.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
}

impl FromRequest for BearerToken {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            extract_bearer_token(req)
                .map(BearerToken)
                .ok_or_else(|| ErrorUnauthorized("Missing or invalid Authorization header")),
        )
    }
}
