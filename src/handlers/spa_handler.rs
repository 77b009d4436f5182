use crate::state::AppState;
use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::{debug, error};

/// Static-file miss: configured views get the application shell, anything else goes to the fallback view.
pub async fn spa_fallback(State(state): State<AppState>, uri: Uri) -> Response {
    let path = uri.path();
    if !state.views.contains(path) {
        let target = state.views.fallback().path.clone();
        debug!("No view for {}, redirecting to {}", path, target);
        return Redirect::permanent(&target).into_response();
    }

    let index = state.www_root.join("index.html");
    match tokio::fs::read_to_string(&index).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to read {}: {}", index.display(), e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Application shell missing").into_response()
        }
    }
}
