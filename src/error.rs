use crate::services::StoreError;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use thiserror::Error;

/// Errors surfaced to HTTP clients. Bodies are plain text.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("No database present")]
    NoDatabase,
    #[error("No database associated")]
    NoDatabaseAssociated,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Incorrect email or password")]
    IncorrectCredentials,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotAcceptable(String),
    #[error("{0}")]
    Unprocessable(String),
    #[error("{0}")]
    NoContent(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NoDatabase | ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NoDatabaseAssociated | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::IncorrectCredentials => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NoContent(_) => StatusCode::NO_CONTENT,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::Unauthorized("User not found".to_string()),
            StoreError::NoSession => ApiError::Unauthorized(e.to_string()),
            StoreError::Duplicate => ApiError::Conflict(e.to_string()),
            StoreError::NoContent => ApiError::NoContent(e.to_string()),
            StoreError::Database(_) | StoreError::Corrupt(_) => {
                tracing::error!("Store failure: {}", e);
                ApiError::Internal("database error".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::NO_CONTENT {
            return status.into_response();
        }
        (status, self.to_string()).into_response()
    }
}
