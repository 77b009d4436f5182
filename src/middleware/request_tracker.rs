use crate::state::AppState;
use axum::{
    body::Body, extract::State, http::Request, http::StatusCode, middleware::Next,
    response::IntoResponse,
};

/// Refuses new work once shutdown has begun and counts requests still running.
pub async fn track_requests(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> impl IntoResponse {
    if state.shutdown_coordinator.is_shutting_down() {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }

    let _guard = state.shutdown_coordinator.enter();
    next.run(req).await
}
