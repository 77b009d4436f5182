use crate::error::ApiError;
use crate::frontend::{plan_overlay, BoxGeometry, HostSnapshot, OverlayPlan, RouteTable};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    #[serde(default)]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct OverlayQuery {
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "single_child")]
    pub children: usize,
}

fn single_child() -> usize {
    1
}

#[derive(Serialize)]
pub struct DirectiveList {
    pub directives: Vec<String>,
}

pub async fn list_views(State(state): State<AppState>) -> Json<RouteTable> {
    Json(state.views.as_ref().clone())
}

/// Resolves a client path; unknown paths come back as the fallback view with `redirected` set.
pub async fn resolve_view(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<Value>, ApiError> {
    let resolution = state.views.resolve(&query.path);
    serde_json::to_value(&resolution)
        .map(Json)
        .map_err(|e| ApiError::Internal(e.to_string()))
}

pub async fn list_directives(State(state): State<AppState>) -> Json<DirectiveList> {
    Json(DirectiveList {
        directives: state
            .directives
            .names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

pub async fn get_upload_overlay(
    Query(query): Query<OverlayQuery>,
) -> Result<Json<OverlayPlan>, ApiError> {
    let host = HostSnapshot {
        bounds: BoxGeometry::new(0.0, 0.0, query.width, query.height),
        child_count: query.children,
    };
    plan_overlay(host)
        .map(Json)
        .map_err(|e| ApiError::Unprocessable(e.to_string()))
}
