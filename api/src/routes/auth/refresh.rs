use actix_web::{web, HttpRequest, HttpResponse};

use auth_core::{AccessTokenIssuer, RefreshSessionRepository, RefreshTokenIssuer, UserGateway};

use crate::app::AppState;
use crate::cookies::REFRESH_COOKIE;
use crate::dto::AccessTokenResponse;
use crate::handlers::{handle_domain_error, unauthorized};
use crate::middleware::RequestId;

/// Handler for POST /v1/<refresh endpoint>
///
/// Exchanges the `refresh_token` cookie for a fresh access token. The cookie
/// is left untouched.
pub async fn refresh<A, T, R, U>(
    req: HttpRequest,
    state: web::Data<AppState<A, T, R, U>>,
    request_id: RequestId,
) -> HttpResponse
where
    A: AccessTokenIssuer + 'static,
    T: RefreshTokenIssuer + 'static,
    R: RefreshSessionRepository + 'static,
    U: UserGateway + 'static,
{
    let Some(cookie) = req.cookie(REFRESH_COOKIE) else {
        return unauthorized(
            "missing refresh_token cookie",
            state.expose_error_details,
            Some(request_id.0),
        );
    };

    match state.auth_service.refresh(cookie.value()).await {
        Ok(result) => HttpResponse::Ok().json(AccessTokenResponse {
            access_token: result.access_token.into_inner(),
        }),
        Err(error) => handle_domain_error(error, state.expose_error_details, Some(request_id.0)),
    }
}
