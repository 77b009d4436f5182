use crate::models::{User, UserContents, UserSession};
use crate::services::store::{StoreError, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

/// Process-local store, used by tests and for database-less development.
#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<String, User>,
    sessions: DashMap<String, UserSession>,
    contents: DashMap<String, UserContents>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn add_user(&self, user: &User) -> Result<(), StoreError> {
        if self.contents.contains_key(&user.user_id) {
            return Err(StoreError::Duplicate);
        }
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(StoreError::Duplicate),
            Entry::Vacant(slot) => {
                slot.insert(user.clone());
            }
        }
        self.contents
            .insert(user.user_id.clone(), UserContents::empty(&user.user_id));
        Ok(())
    }

    async fn lookup_user(&self, email: &str) -> Result<User, StoreError> {
        self.users
            .get(email)
            .map(|u| u.value().clone())
            .ok_or(StoreError::NotFound)
    }

    async fn is_unique_identifier(&self, identifier: &str) -> Result<bool, StoreError> {
        Ok(!self
            .users
            .iter()
            .any(|u| u.user_id == identifier || u.salt == identifier))
    }

    async fn insert_session(&self, session: &UserSession) -> Result<(), StoreError> {
        self.sessions
            .insert(session.session_key.clone(), session.clone());
        Ok(())
    }

    async fn get_session(&self, session_key: &str) -> Result<UserSession, StoreError> {
        self.sessions
            .get(session_key)
            .map(|s| s.value().clone())
            .ok_or(StoreError::NoSession)
    }

    async fn rotate_session(
        &self,
        session_key: &str,
        new_key: &str,
        last_seen: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let (_, mut session) = self
            .sessions
            .remove(session_key)
            .ok_or(StoreError::NoSession)?;
        session.session_key = new_key.to_string();
        session.last_seen = last_seen;
        self.sessions.insert(new_key.to_string(), session);
        Ok(())
    }

    async fn remove_session(&self, session_key: &str) -> Result<(), StoreError> {
        self.sessions
            .remove(session_key)
            .map(|_| ())
            .ok_or(StoreError::NoSession)
    }

    async fn remove_idle_sessions(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let before = self.sessions.len();
        self.sessions.retain(|_, s| s.last_seen > cutoff);
        Ok((before - self.sessions.len()) as u64)
    }

    async fn get_contents(&self, user_id: &str) -> Result<UserContents, StoreError> {
        self.contents
            .get(user_id)
            .map(|c| c.value().clone())
            .ok_or(StoreError::NoContent)
    }

    async fn update_contents(
        &self,
        user_id: &str,
        contents: &UserContents,
    ) -> Result<(), StoreError> {
        let mut stored = self
            .contents
            .get_mut(user_id)
            .ok_or(StoreError::NoContent)?;
        *stored = UserContents {
            user_id: user_id.to_string(),
            ..contents.clone()
        };
        Ok(())
    }

    async fn user_id_for_public_name(&self, public_name: &str) -> Result<String, StoreError> {
        self.contents
            .iter()
            .find(|c| !c.public_name.is_empty() && c.public_name == public_name)
            .map(|c| c.user_id.clone())
            .ok_or(StoreError::NoContent)
    }

    async fn public_name_taken(
        &self,
        public_name: &str,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        Ok(self
            .contents
            .iter()
            .any(|c| !public_name.is_empty() && c.public_name == public_name && c.user_id != user_id))
    }
}
