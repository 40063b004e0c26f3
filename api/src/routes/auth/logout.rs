use actix_web::{web, HttpResponse};

use auth_core::{AccessTokenIssuer, RefreshSessionRepository, RefreshTokenIssuer, UserGateway};

use crate::app::AppState;
use crate::cookies::expired_refresh_cookie;

/// Handler for POST /v1/auth/logout
///
/// Tells the browser to drop the refresh cookie. The stored session is not
/// touched and stays valid until it expires.
pub async fn logout<A, T, R, U>(state: web::Data<AppState<A, T, R, U>>) -> HttpResponse
where
    A: AccessTokenIssuer + 'static,
    T: RefreshTokenIssuer + 'static,
    R: RefreshSessionRepository + 'static,
    U: UserGateway + 'static,
{
    HttpResponse::NoContent()
        .cookie(expired_refresh_cookie(state.auth_service.refresh_endpoint()))
        .finish()
}
