use crate::models::{User, UserContents, UserSession};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("User was not found in database")]
    NotFound,
    #[error("User already registered")]
    Duplicate,
    #[error("Session was not found for the specified user")]
    NoSession,
    #[error("No content in database for the specified user")]
    NoContent,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("corrupt stored value: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Persistence for users, their sessions and their profile contents.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts the user together with an empty profile.
    async fn add_user(&self, user: &User) -> Result<(), StoreError>;

    async fn lookup_user(&self, email: &str) -> Result<User, StoreError>;

    /// True when no user has `identifier` as id or salt.
    async fn is_unique_identifier(&self, identifier: &str) -> Result<bool, StoreError>;

    async fn insert_session(&self, session: &UserSession) -> Result<(), StoreError>;

    async fn get_session(&self, session_key: &str) -> Result<UserSession, StoreError>;

    /// Replaces the session key and bumps the last seen time.
    async fn rotate_session(
        &self,
        session_key: &str,
        new_key: &str,
        last_seen: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    async fn remove_session(&self, session_key: &str) -> Result<(), StoreError>;

    /// Removes sessions last seen at or before `cutoff`, returning how many went.
    async fn remove_idle_sessions(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError>;

    async fn get_contents(&self, user_id: &str) -> Result<UserContents, StoreError>;

    async fn update_contents(&self, user_id: &str, contents: &UserContents)
        -> Result<(), StoreError>;

    async fn user_id_for_public_name(&self, public_name: &str) -> Result<String, StoreError>;

    /// True when a user other than `user_id` already owns `public_name`.
    async fn public_name_taken(&self, public_name: &str, user_id: &str)
        -> Result<bool, StoreError>;

    async fn close(&self) {}
}
