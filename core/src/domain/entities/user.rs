//! User as seen by the auth service: the outcome of a credential check.

use serde::{Deserialize, Serialize};

/// User returned by the user service after a successful credential check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub status: String,
}

impl VerifiedUser {
    /// Subject identifier placed in tokens and sessions
    pub fn subject(&self) -> &str {
        &self.email
    }
}
