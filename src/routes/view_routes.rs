use crate::handlers::{get_upload_overlay, list_directives, list_views, resolve_view};
use crate::state::AppState;
use axum::{routing::get, Router};

/// Client view table and directive plans.
pub fn create_view_routes() -> Router<AppState> {
    Router::new()
        .route("/api/views", get(list_views))
        .route("/api/views/resolve", get(resolve_view))
        .route("/api/ui/directives", get(list_directives))
        .route(
            "/api/ui/directives/file-upload-button",
            get(get_upload_overlay),
        )
}
