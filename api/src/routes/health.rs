use actix_web::{web, HttpResponse};
use std::time::Duration;

use auth_core::{AccessTokenIssuer, RefreshSessionRepository, RefreshTokenIssuer, UserGateway};

use crate::app::AppState;

const PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Handler for GET /healthz: probes the session store
pub async fn healthz<A, T, R, U>(state: web::Data<AppState<A, T, R, U>>) -> HttpResponse
where
    A: AccessTokenIssuer + 'static,
    T: RefreshTokenIssuer + 'static,
    R: RefreshSessionRepository + 'static,
    U: UserGateway + 'static,
{
    match tokio::time::timeout(PROBE_TIMEOUT, state.auth_service.check_store()).await {
        Ok(Ok(())) => HttpResponse::Ok().content_type("text/plain").body("ok"),
        Ok(Err(error)) => {
            tracing::warn!(error = %error, "session store health check failed");
            not_ready()
        }
        Err(_) => {
            tracing::warn!(timeout = ?PROBE_TIMEOUT, "session store health check timed out");
            not_ready()
        }
    }
}

fn not_ready() -> HttpResponse {
    HttpResponse::ServiceUnavailable()
        .content_type("text/plain")
        .body("session store not ready")
}
