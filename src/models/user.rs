use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct User {
    #[sqlx(rename = "EMail")]
    pub email: String,
    #[sqlx(rename = "UserId")]
    pub user_id: String,
    /// Encoded scrypt hash, never the plain password.
    #[sqlx(rename = "Password")]
    pub password: String,
    #[sqlx(rename = "PasswordSalt")]
    pub salt: String,
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct UserSession {
    #[sqlx(rename = "SessionKey")]
    pub session_key: String,
    #[sqlx(rename = "UserId")]
    pub user_id: String,
    #[sqlx(rename = "LoginTime")]
    pub login_time: DateTime<Utc>,
    #[sqlx(rename = "LastSeenTime")]
    pub last_seen: DateTime<Utc>,
}

/// Body of login and register requests.
#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}
