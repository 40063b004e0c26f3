use actix_web::{web, HttpResponse};
use validator::Validate;

use auth_core::{AccessTokenIssuer, RefreshSessionRepository, RefreshTokenIssuer, UserGateway};

use crate::app::AppState;
use crate::cookies::refresh_cookie;
use crate::dto::{AccessTokenResponse, LoginRequest};
use crate::handlers::{handle_domain_error, handle_validation_errors};
use crate::middleware::{RequestId, RequestMeta};

/// Handler for POST /v1/auth/login
///
/// Verifies the credentials, opens a refresh session and answers with the
/// access token in the body and the refresh token in an HttpOnly cookie.
///
/// # Errors
/// - 400: malformed email or empty password
/// - 401: credentials rejected by the user service
/// - 500: user service, signing or session store failure
pub async fn login<A, T, R, U>(
    state: web::Data<AppState<A, T, R, U>>,
    body: web::Json<LoginRequest>,
    meta: RequestMeta,
    request_id: RequestId,
) -> HttpResponse
where
    A: AccessTokenIssuer + 'static,
    T: RefreshTokenIssuer + 'static,
    R: RefreshSessionRepository + 'static,
    U: UserGateway + 'static,
{
    let request = body.into_inner();
    if let Err(errors) = request.validate() {
        return handle_validation_errors(&errors, state.expose_error_details, Some(request_id.0));
    }

    match state
        .auth_service
        .login(
            &request.email,
            &request.password,
            &meta.user_agent,
            &meta.ip_address,
        )
        .await
    {
        Ok(result) => HttpResponse::Ok()
            .cookie(refresh_cookie(
                result.refresh_token.as_str(),
                &result.refresh_endpoint,
                result.refresh_max_age_secs,
            ))
            .json(AccessTokenResponse {
                access_token: result.access_token.into_inner(),
            }),
        Err(error) => handle_domain_error(error, state.expose_error_details, Some(request_id.0)),
    }
}
