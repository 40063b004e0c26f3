//! In-process refresh session store for development and tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use auth_core::domain::entities::retention_ttl;
use auth_core::errors::{DomainError, SessionError};
use auth_core::{RefreshSessionRepository, RefreshTokenSession};

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

struct Entry {
    session: RefreshTokenSession,
    retain_until: DateTime<Utc>,
}

/// Refresh session store backed by a `HashMap`
///
/// Records stay readable until their retention deadline, computed with the
/// same one-minute floor as the Redis TTL. Dead records are dropped lazily.
pub struct MemoryRefreshSessionRepository {
    entries: RwLock<HashMap<String, Entry>>,
    clock: Clock,
}

impl Default for MemoryRefreshSessionRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRefreshSessionRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(Utc::now))
    }

    /// Use `clock` instead of the wall clock for retention decisions
    pub fn with_clock(clock: Clock) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of records currently held, live or not
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drop every record past its retention deadline
    pub async fn purge_expired(&self) -> usize {
        let now = (self.clock)();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.retain_until > now);
        before - entries.len()
    }
}

#[async_trait]
impl RefreshSessionRepository for MemoryRefreshSessionRepository {
    async fn save(&self, session: &RefreshTokenSession) -> Result<(), DomainError> {
        let now = (self.clock)();
        let ttl = retention_ttl(session.expires_at, now);
        let retain_until = now
            + chrono::Duration::from_std(ttl).map_err(|e| DomainError::Internal {
                message: format!("retention window out of range: {}", e),
            })?;

        // Check and insert under one write lock
        let mut entries = self.entries.write().await;
        if let Some(existing) = entries.get(&session.token_hash) {
            if existing.retain_until > now {
                return Err(SessionError::AlreadyExists.into());
            }
        }
        entries.insert(
            session.token_hash.clone(),
            Entry {
                session: session.clone(),
                retain_until,
            },
        );

        debug!(session_id = %session.id, ttl_secs = ttl.as_secs(), "refresh session stored in memory");
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<RefreshTokenSession, DomainError> {
        let now = (self.clock)();
        {
            let entries = self.entries.read().await;
            match entries.get(token) {
                Some(entry) if entry.retain_until > now => return Ok(entry.session.clone()),
                Some(_) => {}
                None => return Err(SessionError::NotFound.into()),
            }
        }

        // Past retention: drop it, unless a fresh save replaced it meanwhile
        let mut entries = self.entries.write().await;
        if entries
            .get(token)
            .is_some_and(|entry| entry.retain_until <= now)
        {
            entries.remove(token);
        }
        Err(SessionError::NotFound.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use auth_core::RefreshToken;
    use chrono::Duration;
    use std::sync::Mutex;

    fn session(token: &str, max_age: Duration) -> RefreshTokenSession {
        RefreshTokenSession::new(
            "member@example.com",
            &RefreshToken::new(token),
            max_age,
            "agent-X",
            "1.2.3.4",
        )
    }

    /// Clock that only moves when told to
    fn manual_clock() -> (Clock, Arc<Mutex<DateTime<Utc>>>) {
        let now = Arc::new(Mutex::new(Utc::now()));
        let handle = now.clone();
        (Arc::new(move || *handle.lock().unwrap()), now)
    }

    #[tokio::test]
    async fn test_save_then_get_returns_equal_session() {
        let repo = MemoryRefreshSessionRepository::new();
        let s = session("tok-1", Duration::days(7));

        repo.save(&s).await.unwrap();

        assert_eq!(repo.get_by_token("tok-1").await.unwrap(), s);
    }

    #[tokio::test]
    async fn test_duplicate_save_keeps_first_record() {
        let repo = MemoryRefreshSessionRepository::new();
        let first = session("dup", Duration::days(7));
        let mut second = session("dup", Duration::days(1));
        second.user_agent = "other-agent".into();

        repo.save(&first).await.unwrap();
        let result = repo.save(&second).await;

        assert_eq!(result, Err(DomainError::Session(SessionError::AlreadyExists)));
        assert_eq!(repo.get_by_token("dup").await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_unknown_token_not_found() {
        let repo = MemoryRefreshSessionRepository::new();
        assert_eq!(
            repo.get_by_token("missing").await,
            Err(DomainError::Session(SessionError::NotFound))
        );
    }

    #[tokio::test]
    async fn test_record_disappears_after_retention() {
        let (clock, now) = manual_clock();
        let repo = MemoryRefreshSessionRepository::with_clock(clock);
        repo.save(&session("short", Duration::seconds(120))).await.unwrap();

        *now.lock().unwrap() += Duration::seconds(119);
        assert!(repo.get_by_token("short").await.is_ok());

        *now.lock().unwrap() += Duration::seconds(2);
        assert_eq!(
            repo.get_by_token("short").await,
            Err(DomainError::Session(SessionError::NotFound))
        );
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_already_expired_session_kept_for_minimum_window() {
        let (clock, now) = manual_clock();
        let repo = MemoryRefreshSessionRepository::with_clock(clock);
        let s = session("late", Duration::seconds(-30));
        repo.save(&s).await.unwrap();

        // Retrievable but expired: the caller decides what that means
        let stored = repo.get_by_token("late").await.unwrap();
        assert!(stored.is_expired());

        *now.lock().unwrap() += Duration::seconds(61);
        assert!(repo.get_by_token("late").await.is_err());
    }

    #[tokio::test]
    async fn test_dead_record_can_be_replaced() {
        let (clock, now) = manual_clock();
        let repo = MemoryRefreshSessionRepository::with_clock(clock);
        repo.save(&session("reuse", Duration::seconds(60))).await.unwrap();

        *now.lock().unwrap() += Duration::seconds(90);
        let fresh = session("reuse", Duration::days(1));
        repo.save(&fresh).await.unwrap();

        assert_eq!(repo.get_by_token("reuse").await.unwrap(), fresh);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (clock, now) = manual_clock();
        let repo = MemoryRefreshSessionRepository::with_clock(clock);
        repo.save(&session("a", Duration::seconds(60))).await.unwrap();
        repo.save(&session("b", Duration::days(1))).await.unwrap();

        *now.lock().unwrap() += Duration::minutes(5);

        assert_eq!(repo.purge_expired().await, 1);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_saves_admit_one() {
        let repo = Arc::new(MemoryRefreshSessionRepository::new());
        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                let mut s = session("contended", Duration::days(1));
                s.user_agent = format!("agent-{}", i);
                repo.save(&s).await
            }));
        }

        let mut ok = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => ok += 1,
                Err(e) => assert_eq!(e, DomainError::Session(SessionError::AlreadyExists)),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(repo.len().await, 1);
    }
}
