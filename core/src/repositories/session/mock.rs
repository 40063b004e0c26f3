//! Mock implementation of RefreshSessionRepository for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::entities::RefreshTokenSession;
use crate::errors::{DomainError, SessionError};

use super::repository::RefreshSessionRepository;

/// Mock session repository that records writes and can be told to fail
#[derive(Clone, Default)]
pub struct MockSessionRepository {
    sessions: Arc<Mutex<HashMap<String, RefreshTokenSession>>>,
    save_calls: Arc<Mutex<usize>>,
    fail_save_with: Arc<Mutex<Option<DomainError>>>,
}

impl MockSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every subsequent `save` fails with `error`
    pub fn fail_saves_with(&self, error: DomainError) {
        *self.fail_save_with.lock().unwrap() = Some(error);
    }

    /// Seed a record directly, bypassing `save`
    pub fn insert(&self, session: RefreshTokenSession) {
        self.sessions
            .lock()
            .unwrap()
            .insert(session.token_hash.clone(), session);
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn save_calls(&self) -> usize {
        *self.save_calls.lock().unwrap()
    }
}

#[async_trait]
impl RefreshSessionRepository for MockSessionRepository {
    async fn save(&self, session: &RefreshTokenSession) -> Result<(), DomainError> {
        *self.save_calls.lock().unwrap() += 1;

        if let Some(error) = self.fail_save_with.lock().unwrap().clone() {
            return Err(error);
        }

        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(&session.token_hash) {
            return Err(SessionError::AlreadyExists.into());
        }
        sessions.insert(session.token_hash.clone(), session.clone());
        Ok(())
    }

    async fn get_by_token(&self, token: &str) -> Result<RefreshTokenSession, DomainError> {
        self.sessions
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or_else(|| SessionError::NotFound.into())
    }
}
