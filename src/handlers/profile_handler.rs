use crate::error::ApiError;
use crate::handlers::auth_handler::authorization;
use crate::models::{ProfileLookup, UserContents};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Json,
};

pub async fn get_profile_view(
    State(state): State<AppState>,
    Json(lookup): Json<ProfileLookup>,
) -> Result<(StatusCode, Json<UserContents>), ApiError> {
    let contents = state.profiles()?.contents(&lookup.user_id).await?;
    Ok((StatusCode::ACCEPTED, Json(contents)))
}

pub async fn get_profile_edit(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<UserContents>), ApiError> {
    let (auth, profiles) = state.profile_auth()?;
    let session = auth.authorize(authorization(&headers)).await?;
    let contents = profiles.contents(&session.user_id).await?;
    Ok((StatusCode::ACCEPTED, Json(contents)))
}

pub async fn save_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(contents): Json<UserContents>,
) -> Result<StatusCode, ApiError> {
    let (auth, profiles) = state.profile_auth()?;
    let session = auth.authorize(authorization(&headers)).await?;
    profiles.save(&session, contents).await?;
    Ok(StatusCode::OK)
}

pub async fn get_public_profile(
    State(state): State<AppState>,
    Path(public_name): Path<String>,
) -> Result<Json<UserContents>, ApiError> {
    let contents = state.profiles()?.by_public_name(&public_name).await?;
    Ok(Json(contents))
}
