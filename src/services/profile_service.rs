use crate::error::ApiError;
use crate::models::{UserContents, UserSession};
use crate::services::store::{StoreError, UserStore};
use std::sync::Arc;

pub struct ProfileService {
    store: Arc<dyn UserStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub async fn contents(&self, user_id: &str) -> Result<UserContents, ApiError> {
        match self.store.get_contents(user_id).await {
            Ok(contents) => Ok(contents),
            Err(StoreError::NoContent) => Err(ApiError::NoContent(
                "No content for the specified user".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn by_public_name(&self, public_name: &str) -> Result<UserContents, ApiError> {
        let user_id = match self.store.user_id_for_public_name(public_name).await {
            Ok(id) => id,
            Err(StoreError::NoContent) => {
                return Err(ApiError::NotFound(format!(
                    "No profile named {}",
                    public_name
                )))
            }
            Err(e) => return Err(e.into()),
        };
        self.contents(&user_id).await
    }

    /// Overwrites the caller's profile. The stored user id always comes from the session.
    pub async fn save(&self, session: &UserSession, contents: UserContents) -> Result<(), ApiError> {
        if !contents.is_valid() {
            return Err(ApiError::NotAcceptable("Invalid content".to_string()));
        }
        if !contents.public_name.is_empty()
            && self
                .store
                .public_name_taken(&contents.public_name, &session.user_id)
                .await?
        {
            return Err(ApiError::Conflict("Public name already taken".to_string()));
        }
        self.store
            .update_contents(&session.user_id, &contents)
            .await?;
        tracing::debug!("Saved profile contents");
        Ok(())
    }
}
