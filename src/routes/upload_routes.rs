use crate::handlers::upload_files_handler;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::post, Router};

/// `kind` is one of `pdf`, `profile-header` or `profile-icon`.
pub fn create_upload_routes(max_body_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/api/upload/{kind}", post(upload_files_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
}
