//! Application state and factory
//!
//! `create_app` is shared by the binary and the integration tests so both
//! run the exact same middleware stack.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::InternalError,
    middleware::DefaultHeaders,
    web, App, Error, HttpMessage, HttpRequest, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use auth_core::{
    AccessTokenIssuer, AuthService, JwkSet, RefreshSessionRepository, RefreshTokenIssuer,
    UserGateway,
};
use auth_shared::{error_codes, AppConfig, CorsConfig, Environment, ErrorResponse};

use crate::cookies::refresh_path;
use crate::handlers::bad_request;
use crate::middleware::{
    create_cors, Recovery, RequestId, RequestIdMiddleware, RequestMetaMiddleware,
};
use crate::routes::{
    auth::{login, logout, me, refresh},
    health::healthz,
    jwks::jwks,
};
use crate::API_VERSION;

/// State shared by every worker
pub struct AppState<A, T, R, U>
where
    A: AccessTokenIssuer,
    T: RefreshTokenIssuer,
    R: RefreshSessionRepository,
    U: UserGateway,
{
    pub auth_service: Arc<AuthService<A, T, R, U>>,
    /// Published at the JWKS route
    pub jwks: JwkSet,
    /// Whether error bodies may carry internal error text
    pub expose_error_details: bool,
}

impl<A, T, R, U> AppState<A, T, R, U>
where
    A: AccessTokenIssuer,
    T: RefreshTokenIssuer,
    R: RefreshSessionRepository,
    U: UserGateway,
{
    pub fn new(
        auth_service: Arc<AuthService<A, T, R, U>>,
        jwks: JwkSet,
        environment: Environment,
    ) -> Self {
        Self {
            auth_service,
            jwks,
            expose_error_details: environment.exposes_error_details(),
        }
    }
}

/// Routing-level settings taken from [`AppConfig`]
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub environment: Environment,
    pub cors: CorsConfig,
    pub jwks_path: String,
}

impl From<&AppConfig> for HttpSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            environment: config.environment,
            cors: config.cors.clone(),
            jwks_path: config.jwt.jwks_path.clone(),
        }
    }
}

/// Create and configure the application
///
/// Middleware, outermost first: CORS, request id, access log, request
/// metadata, panic recovery.
pub fn create_app<A, T, R, U>(
    app_state: web::Data<AppState<A, T, R, U>>,
    settings: &HttpSettings,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    A: AccessTokenIssuer + 'static,
    T: RefreshTokenIssuer + 'static,
    R: RefreshSessionRepository + 'static,
    U: UserGateway + 'static,
{
    let expose_details = app_state.expose_error_details;
    let refresh_route = refresh_path(app_state.auth_service.refresh_endpoint());

    let json_config = web::JsonConfig::default().error_handler(move |err, req| {
        let response = bad_request(err.to_string(), expose_details, request_id_of(req));
        InternalError::from_response(err, response).into()
    });

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        .wrap(Recovery)
        .wrap(RequestMetaMiddleware)
        .wrap(TracingLogger::default())
        .wrap(RequestIdMiddleware)
        .wrap(create_cors(&settings.cors, settings.environment))
        .route("/healthz", web::get().to(healthz::<A, T, R, U>))
        .route(&settings.jwks_path, web::get().to(jwks::<A, T, R, U>))
        .route(&refresh_route, web::post().to(refresh::<A, T, R, U>).wrap(version_header()))
        .service(
            web::scope("/v1/auth")
                .wrap(version_header())
                .route("/login", web::post().to(login::<A, T, R, U>))
                .route("/logout", web::post().to(logout::<A, T, R, U>))
                .route("/me", web::get().to(me::<A, T, R, U>)),
        )
        .default_service(web::route().to(not_found))
}

fn version_header() -> DefaultHeaders {
    DefaultHeaders::new().add(("Version-Id", API_VERSION))
}

fn request_id_of(req: &HttpRequest) -> Option<String> {
    req.extensions().get::<RequestId>().map(|id| id.0.clone())
}

/// Default 404 handler
async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::new(error_codes::NOT_FOUND, "The requested resource was not found")
            .with_request_id(request_id_of(&req)),
    )
}
