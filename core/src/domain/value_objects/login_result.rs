//! Results of the login and refresh flows.

use crate::domain::entities::{AccessToken, RefreshToken};

/// Everything the transport layer needs to answer a successful login
///
/// The refresh token travels to the client in a cookie scoped to
/// `refresh_endpoint` with `Max-Age = refresh_max_age_secs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
    pub refresh_max_age_secs: i64,
    pub refresh_endpoint: String,
}

/// Result of exchanging a refresh token for a new access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshResult {
    pub access_token: AccessToken,
    pub member_id: String,
}
