//! HTTP client for the user service's credential check.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use auth_core::errors::{AuthError, DomainError};
use auth_core::{UserGateway, VerifiedUser};
use auth_shared::UserServiceConfig;

use crate::InfrastructureError;

const VERIFY_PATH: &str = "/internal/users/verify";

#[derive(Serialize)]
struct VerifyRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Calls `POST {base_url}/internal/users/verify`
///
/// Status handling:
/// * `200` - body decoded into [`VerifiedUser`]
/// * `401` - [`AuthError::InvalidCredentials`]
/// * anything else, or no answer in time - [`AuthError::UserServiceUnavailable`]
#[derive(Clone)]
pub struct HttpUserGateway {
    client: reqwest::Client,
    verify_url: String,
}

impl HttpUserGateway {
    pub fn new(config: &UserServiceConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            verify_url: format!("{}{}", config.base_url.trim_end_matches('/'), VERIFY_PATH),
        })
    }
}

fn unavailable(message: impl Into<String>) -> DomainError {
    AuthError::UserServiceUnavailable {
        message: message.into(),
    }
    .into()
}

#[async_trait]
impl UserGateway for HttpUserGateway {
    async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<VerifiedUser, DomainError> {
        let response = self
            .client
            .post(&self.verify_url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&VerifyRequest { email, password })
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "user service request failed");
                unavailable(format!("user verify: {}", e))
            })?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| unavailable(format!("user verify: {}", e)))?;
                if body.is_empty() {
                    return Err(DomainError::Internal {
                        message: "user verify: 200 but empty JSON body".to_string(),
                    });
                }
                let user: VerifiedUser =
                    serde_json::from_slice(&body).map_err(|e| DomainError::Internal {
                        message: format!("user verify: malformed body: {}", e),
                    })?;
                debug!(user_id = %user.id, "credentials verified");
                Ok(user)
            }
            StatusCode::UNAUTHORIZED => Err(AuthError::InvalidCredentials.into()),
            status => {
                let body = response.text().await.unwrap_or_default();
                warn!(status = status.as_u16(), "user service answered unexpectedly");
                Err(unavailable(format!(
                    "user verify unexpected status={} body={}",
                    status.as_u16(),
                    body
                )))
            }
        }
    }
}
