use crate::handlers::{get_profile_edit, get_profile_view, get_public_profile, save_profile};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_profile_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile/save", post(save_profile))
        .route(
            "/api/profile/get-edit",
            get(get_profile_edit).post(get_profile_edit),
        )
        .route("/api/profile/get-view", post(get_profile_view))
        .route("/api/profile/public/{name}", get(get_public_profile))
}
