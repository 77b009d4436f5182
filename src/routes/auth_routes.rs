use crate::handlers::{login, logout, refresh_token, register};
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn create_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/register", post(register))
        .route("/api/refreshtoken", post(refresh_token))
}
