//! CORS configuration for browser clients.
//!
//! Development accepts any origin. Production only accepts the configured
//! allow-list; the refresh cookie requires credentials in both cases.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use auth_shared::{CorsConfig, Environment};

pub fn create_cors(config: &CorsConfig, environment: Environment) -> Cors {
    if environment.is_production() {
        create_production_cors(config)
    } else {
        create_development_cors(config)
    }
}

fn base_cors(max_age: usize) -> Cors {
    Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::AUTHORIZATION,
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::HeaderName::from_static("x-request-id"),
        ])
        .expose_headers(vec![
            header::HeaderName::from_static("x-request-id"),
            header::HeaderName::from_static("version-id"),
        ])
        .max_age(max_age)
        .supports_credentials()
}

fn create_development_cors(config: &CorsConfig) -> Cors {
    tracing::info!("configuring permissive CORS for development");

    if config.allowed_origins.is_empty() {
        return base_cors(config.max_age).allow_any_origin();
    }
    with_origins(base_cors(config.max_age), &config.allowed_origins)
}

fn create_production_cors(config: &CorsConfig) -> Cors {
    tracing::info!(
        origins = config.allowed_origins.len(),
        "configuring CORS allow-list for production"
    );
    with_origins(base_cors(config.max_age), &config.allowed_origins)
}

/// A `*` entry widens to any origin; `Cors::allowed_origin` rejects it
fn with_origins(mut cors: Cors, origins: &[String]) -> Cors {
    let origins: Vec<&str> = origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .collect();

    if origins.contains(&"*") {
        tracing::warn!("wildcard CORS origin configured, accepting any origin");
        return cors.allow_any_origin();
    }
    for origin in origins {
        cors = cors.allowed_origin(origin);
    }
    cors
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, web, App, HttpResponse};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    fn config(origins: &[&str]) -> CorsConfig {
        CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            max_age: 600,
        }
    }

    #[actix_web::test]
    async fn test_production_rejects_unlisted_origin() {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config(&["https://app.example.com"]), Environment::Production))
                .route("/", web::get().to(ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://app.example.com"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://app.example.com"
        );

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://evil.example.com"))
            .to_request();
        let resp = test::try_call_service(&app, req).await;
        match resp {
            Ok(resp) => assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none()),
            Err(err) => assert_eq!(err.as_response_error().status_code(), StatusCode::BAD_REQUEST),
        }
    }

    #[actix_web::test]
    async fn test_development_allows_any_origin() {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(&config(&[]), Environment::Development))
                .route("/", web::get().to(ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
            "true"
        );
    }

    #[actix_web::test]
    async fn test_wildcard_origin_accepts_any_origin() {
        let app = test::init_service(
            App::new()
                .wrap(create_cors(
                    &config(&[" * ", "https://app.example.com"]),
                    Environment::Production,
                ))
                .route("/", web::get().to(ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ORIGIN, "https://other.example.org"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "https://other.example.org"
        );
    }
}
