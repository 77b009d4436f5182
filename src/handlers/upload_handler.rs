use crate::error::ApiError;
use crate::services::{UploadError, UploadKind};
use crate::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;

/// Multipart field carrying the files.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub paths: Vec<String>,
}

pub async fn upload_files_handler(
    State(state): State<AppState>,
    Path(kind): Path<UploadKind>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut paths: Vec<String> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        let path = state
            .upload_service
            .save(kind, &name, &data)
            .await
            .map_err(|e| match e {
                UploadError::InvalidName(_) => ApiError::BadRequest(e.to_string()),
                UploadError::Io(_) => {
                    tracing::error!("Upload failed: {}", e);
                    ApiError::Internal(e.to_string())
                }
            })?;
        paths.push(path);
    }

    if paths.is_empty() {
        return Err(ApiError::BadRequest("No file provided".to_string()));
    }
    Ok(Json(UploadResponse { paths }))
}
