use crate::models::{DbPool, Pdf, User, UserContents, UserSession};
use crate::services::store::{StoreError, UserStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

pub struct MySqlUserStore {
    pool: DbPool,
}

#[derive(FromRow)]
struct ContentRow {
    #[sqlx(rename = "UserId")]
    user_id: String,
    #[sqlx(rename = "FullName")]
    full_name: String,
    #[sqlx(rename = "Phone")]
    phone: String,
    #[sqlx(rename = "EMail")]
    email: String,
    #[sqlx(rename = "ProfileIcon")]
    profile_icon: String,
    #[sqlx(rename = "ProfileHeader")]
    profile_header: String,
    #[sqlx(rename = "Description")]
    description: String,
    #[sqlx(rename = "PublicName")]
    public_name: String,
    #[sqlx(rename = "PDFs")]
    pdfs: String,
}

impl TryFrom<ContentRow> for UserContents {
    type Error = StoreError;

    fn try_from(row: ContentRow) -> Result<Self, Self::Error> {
        let pdfs: Vec<Pdf> = if row.pdfs.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&row.pdfs)?
        };
        Ok(Self {
            user_id: row.user_id,
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            profile_icon: row.profile_icon,
            profile_header: row.profile_header,
            description: row.description,
            public_name: row.public_name,
            pdfs,
        })
    }
}

fn duplicate_or(e: sqlx::Error) -> StoreError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StoreError::Duplicate,
        _ => StoreError::Database(e),
    }
}

impl MySqlUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for MySqlUserStore {
    async fn add_user(&self, user: &User) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO Users (EMail, UserId, Password, PasswordSalt) VALUES (?, ?, ?, ?)")
            .bind(&user.email)
            .bind(&user.user_id)
            .bind(&user.password)
            .bind(&user.salt)
            .execute(&mut *tx)
            .await
            .map_err(duplicate_or)?;

        sqlx::query(
            r#"
            INSERT INTO UserContent (UserId, FullName, Phone, EMail, ProfileIcon, ProfileHeader, Description, PublicName, PDFs)
            VALUES (?, '', '', '', '', '', '', '', '[]')
            "#,
        )
        .bind(&user.user_id)
        .execute(&mut *tx)
        .await
        .map_err(duplicate_or)?;

        tx.commit().await?;
        Ok(())
    }

    async fn lookup_user(&self, email: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            "SELECT EMail, UserId, Password, PasswordSalt FROM Users WHERE EMail = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn is_unique_identifier(&self, identifier: &str) -> Result<bool, StoreError> {
        let taken: Option<(String,)> =
            sqlx::query_as("SELECT UserId FROM Users WHERE UserId = ? OR PasswordSalt = ? LIMIT 1")
                .bind(identifier)
                .bind(identifier)
                .fetch_optional(&self.pool)
                .await?;
        Ok(taken.is_none())
    }

    async fn insert_session(&self, session: &UserSession) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO UserSession (SessionKey, UserId, LoginTime, LastSeenTime) VALUES (?, ?, ?, ?)",
        )
        .bind(&session.session_key)
        .bind(&session.user_id)
        .bind(session.login_time)
        .bind(session.last_seen)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_session(&self, session_key: &str) -> Result<UserSession, StoreError> {
        sqlx::query_as::<_, UserSession>(
            "SELECT SessionKey, UserId, LoginTime, LastSeenTime FROM UserSession WHERE SessionKey = ?",
        )
        .bind(session_key)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NoSession)
    }

    async fn rotate_session(
        &self,
        session_key: &str,
        new_key: &str,
        last_seen: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE UserSession SET SessionKey = ?, LastSeenTime = ? WHERE SessionKey = ?",
        )
        .bind(new_key)
        .bind(last_seen)
        .bind(session_key)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NoSession);
        }
        Ok(())
    }

    async fn remove_session(&self, session_key: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM UserSession WHERE SessionKey = ?")
            .bind(session_key)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NoSession);
        }
        Ok(())
    }

    async fn remove_idle_sessions(&self, cutoff: DateTime<Utc>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM UserSession WHERE LastSeenTime <= ?")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn get_contents(&self, user_id: &str) -> Result<UserContents, StoreError> {
        let row = sqlx::query_as::<_, ContentRow>(
            r#"
            SELECT UserId, FullName, Phone, EMail, ProfileIcon, ProfileHeader, Description, PublicName, PDFs
            FROM UserContent WHERE UserId = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NoContent)?;
        row.try_into()
    }

    async fn update_contents(
        &self,
        user_id: &str,
        contents: &UserContents,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            UPDATE UserContent
            SET FullName = ?, Phone = ?, EMail = ?, ProfileIcon = ?, ProfileHeader = ?, Description = ?, PublicName = ?, PDFs = ?
            WHERE UserId = ?
            "#,
        )
        .bind(&contents.full_name)
        .bind(&contents.phone)
        .bind(&contents.email)
        .bind(&contents.profile_icon)
        .bind(&contents.profile_header)
        .bind(&contents.description)
        .bind(&contents.public_name)
        .bind(serde_json::to_string(&contents.pdfs)?)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn user_id_for_public_name(&self, public_name: &str) -> Result<String, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT UserId FROM UserContent WHERE PublicName = ? LIMIT 1")
                .bind(public_name)
                .fetch_optional(&self.pool)
                .await?;
        row.map(|(id,)| id).ok_or(StoreError::NoContent)
    }

    async fn public_name_taken(
        &self,
        public_name: &str,
        user_id: &str,
    ) -> Result<bool, StoreError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT UserId FROM UserContent WHERE PublicName = ? AND UserId <> ? LIMIT 1",
        )
        .bind(public_name)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
