use actix_web::{web, HttpResponse};

use auth_core::{AccessTokenIssuer, RefreshSessionRepository, RefreshTokenIssuer, UserGateway};

use crate::app::AppState;
use crate::dto::MeResponse;
use crate::handlers::{handle_domain_error, unauthorized};
use crate::middleware::{BearerToken, RequestId};

/// Handler for GET /v1/auth/me: the subject of a valid access token
pub async fn me<A, T, R, U>(
    state: web::Data<AppState<A, T, R, U>>,
    bearer: Option<BearerToken>,
    request_id: RequestId,
) -> HttpResponse
where
    A: AccessTokenIssuer + 'static,
    T: RefreshTokenIssuer + 'static,
    R: RefreshSessionRepository + 'static,
    U: UserGateway + 'static,
{
    let Some(BearerToken(token)) = bearer else {
        return unauthorized(
            "missing or invalid Authorization header",
            state.expose_error_details,
            Some(request_id.0),
        );
    };

    match state.auth_service.parse_access_token(&token) {
        Ok(subject) => HttpResponse::Ok().json(MeResponse { subject }),
        Err(error) => handle_domain_error(error, state.expose_error_details, Some(request_id.0)),
    }
}
