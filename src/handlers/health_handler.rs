use crate::state::AppState;
use axum::{extract::State, response::Json};
use chrono::Utc;
use serde_json::json;

pub async fn get_api_health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let database = if state.auth_service.is_some() {
        "connected"
    } else {
        "absent"
    };
    Json(json!({
        "status": if state.shutdown_coordinator.is_shutting_down() { "shutting_down" } else { "healthy" },
        "database": database,
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
        "in_flight": state.shutdown_coordinator.in_flight(),
    }))
}
