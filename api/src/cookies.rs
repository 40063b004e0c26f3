//! The `refresh_token` cookie.
//!
//! Scoped to `/v1/<endpoint>` so the browser only sends it to the refresh
//! route.

use actix_web::cookie::{time::Duration, Cookie, SameSite};

pub const REFRESH_COOKIE: &str = "refresh_token";

/// Absolute path of the refresh route for a configured endpoint
pub fn refresh_path(endpoint: &str) -> String {
    format!("/v1/{}", endpoint.trim_start_matches('/'))
}

pub fn refresh_cookie(token: &str, endpoint: &str, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(REFRESH_COOKIE, token.to_string())
        .path(refresh_path(endpoint))
        .max_age(Duration::seconds(max_age_secs))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .finish()
}

/// Same scope as [`refresh_cookie`] with `Max-Age=0`, telling the browser to drop it
pub fn expired_refresh_cookie(endpoint: &str) -> Cookie<'static> {
    refresh_cookie("", endpoint, 0)
}
