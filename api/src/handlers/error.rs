//! Mapping from domain errors to HTTP responses

use actix_web::{http::StatusCode, HttpResponse};
use validator::ValidationErrors;

use auth_core::{AuthError, DomainError, SessionError, TokenError};
use auth_shared::{error_codes, ErrorResponse};

/// Status and machine-readable code for a domain error
pub fn classify(error: &DomainError) -> (StatusCode, &'static str) {
    match error {
        DomainError::Validation { .. } => (StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR),
        DomainError::Auth(AuthError::InvalidCredentials) => {
            (StatusCode::UNAUTHORIZED, error_codes::INVALID_CREDENTIALS)
        }
        DomainError::Token(TokenError::Expired | TokenError::RefreshTokenExpired) => {
            (StatusCode::UNAUTHORIZED, error_codes::TOKEN_EXPIRED)
        }
        DomainError::Token(TokenError::Invalid | TokenError::Revoked)
        | DomainError::Session(SessionError::NotFound) => {
            (StatusCode::UNAUTHORIZED, error_codes::TOKEN_INVALID)
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, error_codes::INTERNAL_ERROR),
    }
}

/// Message shown when error details are hidden
fn generic_message(code: &str) -> &'static str {
    match code {
        error_codes::VALIDATION_ERROR => "Request validation failed",
        error_codes::INVALID_CREDENTIALS => "Invalid email or password",
        error_codes::TOKEN_EXPIRED => "Token has expired",
        error_codes::TOKEN_INVALID => "Token is invalid",
        error_codes::BAD_REQUEST => "Malformed request",
        error_codes::UNAUTHORIZED => "Authentication required",
        _ => "An internal error occurred",
    }
}

fn respond(
    status: StatusCode,
    code: &'static str,
    detail: String,
    expose_details: bool,
    request_id: Option<String>,
) -> HttpResponse {
    let message = if expose_details {
        detail
    } else {
        generic_message(code).to_string()
    };
    HttpResponse::build(status).json(ErrorResponse::new(code, message).with_request_id(request_id))
}

/// Convert a domain error into a JSON error response
///
/// Server-side failures are logged at error level, client mistakes at debug.
pub fn handle_domain_error(
    error: DomainError,
    expose_details: bool,
    request_id: Option<String>,
) -> HttpResponse {
    let (status, code) = classify(&error);

    if status.is_server_error() {
        tracing::error!(error = %error, request_id = ?request_id, "request failed");
    } else {
        tracing::debug!(error = %error, request_id = ?request_id, "request rejected");
    }

    respond(status, code, error.to_string(), expose_details, request_id)
}

/// 400 for a body that failed `validator` checks
pub fn handle_validation_errors(
    errors: &ValidationErrors,
    expose_details: bool,
    request_id: Option<String>,
) -> HttpResponse {
    let fields = errors
        .field_errors()
        .keys()
        .copied()
        .collect::<Vec<_>>()
        .join(", ");
    respond(
        StatusCode::BAD_REQUEST,
        error_codes::VALIDATION_ERROR,
        format!("invalid fields: {}", fields),
        expose_details,
        request_id,
    )
}

/// 400 for a body that is not valid JSON for the endpoint
pub fn bad_request(detail: String, expose_details: bool, request_id: Option<String>) -> HttpResponse {
    respond(
        StatusCode::BAD_REQUEST,
        error_codes::BAD_REQUEST,
        detail,
        expose_details,
        request_id,
    )
}

/// 401 when the caller supplied no credential at all
pub fn unauthorized(detail: &str, expose_details: bool, request_id: Option<String>) -> HttpResponse {
    respond(
        StatusCode::UNAUTHORIZED,
        error_codes::UNAUTHORIZED,
        detail.to_string(),
        expose_details,
        request_id,
    )
}
