use crate::error::ApiError;
use crate::models::{Credentials, TokenResponse};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::Json,
};

pub(crate) fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

fn accepted(token: String) -> (StatusCode, Json<TokenResponse>) {
    (StatusCode::ACCEPTED, Json(TokenResponse { token }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let token = state.auth()?.login(credentials).await?;
    Ok(accepted(token))
}

pub async fn register(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let token = state.auth()?.register(credentials).await?;
    Ok(accepted(token))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    let token = state.auth()?.refresh(authorization(&headers)).await?;
    Ok(accepted(token))
}

pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    state.auth()?.logout(authorization(&headers)).await?;
    Ok(StatusCode::OK)
}
