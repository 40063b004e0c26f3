//! Refresh session entity: the server-side record behind a refresh token.

use chrono::{DateTime, Duration, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::token::RefreshToken;

/// Shortest retention window a session is ever stored with. Guards against
/// clock skew producing a zero or negative TTL, which Redis treats as
/// "delete immediately".
pub const MIN_RETENTION_SECONDS: i64 = 60;

/// Server-side record binding a refresh token to its subject
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenSession {
    /// Diagnostic identifier, never used for lookup
    pub id: Uuid,

    /// Subject the session belongs to (the verified user's email)
    pub member_id: String,

    /// The refresh token value itself, stored as issued
    pub token_hash: String,

    pub expires_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,

    /// Not written by any current flow
    #[serde(default)]
    pub revoked_at: Option<DateTime<Utc>>,

    pub user_agent: String,

    pub ip_address: String,
}

impl RefreshTokenSession {
    /// Build a fresh session expiring `max_age` from now
    ///
    /// Timestamps are truncated to microseconds so the record survives a
    /// round-trip through `DATETIME(6)` columns unchanged.
    pub fn new(
        member_id: impl Into<String>,
        token: &RefreshToken,
        max_age: Duration,
        user_agent: impl Into<String>,
        ip_address: impl Into<String>,
    ) -> Self {
        let created_at = Utc::now().trunc_subsecs(6);
        Self {
            id: Uuid::new_v4(),
            member_id: member_id.into(),
            token_hash: token.as_str().to_string(),
            expires_at: created_at + max_age,
            created_at,
            revoked_at: None,
            user_agent: user_agent.into(),
            ip_address: ip_address.into(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Time until expiration, zero when already expired
    pub fn time_until_expiration(&self) -> Duration {
        let remaining = self.expires_at - Utc::now();
        if remaining < Duration::zero() {
            Duration::zero()
        } else {
            remaining
        }
    }

    /// How long the store must keep this record when written at `now`
    pub fn retention_ttl(&self, now: DateTime<Utc>) -> std::time::Duration {
        retention_ttl(self.expires_at, now)
    }
}

/// `max(expires_at - now, MIN_RETENTION_SECONDS)`, shared by every store backend
pub fn retention_ttl(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> std::time::Duration {
    let seconds = (expires_at - now).num_seconds().max(MIN_RETENTION_SECONDS);
    // `seconds` is at least MIN_RETENTION_SECONDS, never negative
    std::time::Duration::from_secs(seconds as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(max_age: Duration) -> RefreshTokenSession {
        RefreshTokenSession::new(
            "member@example.com",
            &RefreshToken::new("opaque-token"),
            max_age,
            "agent-X",
            "1.2.3.4",
        )
    }

    #[test]
    fn test_new_session_fields() {
        let s = session(Duration::seconds(3600));
        assert_eq!(s.member_id, "member@example.com");
        assert_eq!(s.token_hash, "opaque-token");
        assert_eq!(s.expires_at - s.created_at, Duration::seconds(3600));
        assert!(s.revoked_at.is_none());
        assert!(!s.is_expired());
        assert!(!s.is_revoked());
    }

    #[test]
    fn test_expired_session() {
        let s = session(Duration::seconds(-5));
        assert!(s.is_expired());
        assert_eq!(s.time_until_expiration(), Duration::zero());
    }

    #[test]
    fn test_retention_ttl_tracks_remaining_lifetime() {
        let now = Utc::now();
        let ttl = retention_ttl(now + Duration::seconds(600), now);
        assert_eq!(ttl.as_secs(), 600);
    }

    #[test]
    fn test_retention_ttl_floor() {
        let now = Utc::now();
        assert_eq!(retention_ttl(now + Duration::seconds(5), now).as_secs(), 60);
        assert_eq!(retention_ttl(now, now).as_secs(), 60);
        assert_eq!(retention_ttl(now - Duration::hours(1), now).as_secs(), 60);
    }

    #[test]
    fn test_json_round_trip_preserves_equality() {
        let s = session(Duration::days(7));
        let json = serde_json::to_string(&s).unwrap();
        let back: RefreshTokenSession = serde_json::from_str(&json).unwrap();
        assert_eq!(s, back);
    }
}
