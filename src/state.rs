use crate::error::ApiError;
use crate::frontend::{DirectiveRegistry, RouteTable};
use crate::services::{AuthService, ProfileService, UploadService};
use crate::utils::ShutdownCoordinator;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub views: Arc<RouteTable>,
    pub directives: Arc<DirectiveRegistry>,
    /// `None` when running without a database.
    pub auth_service: Option<Arc<AuthService>>,
    pub profile_service: Option<Arc<ProfileService>>,
    pub upload_service: Arc<UploadService>,
    pub shutdown_coordinator: ShutdownCoordinator,
    pub www_root: PathBuf,
}

impl AppState {
    pub fn auth(&self) -> Result<&AuthService, ApiError> {
        self.auth_service.as_deref().ok_or(ApiError::NoDatabase)
    }

    /// Authentication for the profile endpoints, which report a missing database differently.
    pub fn profile_auth(&self) -> Result<(&AuthService, &ProfileService), ApiError> {
        match (&self.auth_service, &self.profile_service) {
            (Some(auth), Some(profiles)) => Ok((auth, profiles)),
            _ => Err(ApiError::NoDatabaseAssociated),
        }
    }

    pub fn profiles(&self) -> Result<&ProfileService, ApiError> {
        self.profile_service
            .as_deref()
            .ok_or(ApiError::NoDatabaseAssociated)
    }
}
