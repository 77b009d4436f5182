use axum::{body::Body, http::Request, middleware::Next, response::IntoResponse};
use tracing::{debug, error, info, Instrument};
use uuid::Uuid;

/// Logs every request and its response status under a per-request id.
pub async fn log_requests(req: Request<Body>, next: Next) -> impl IntoResponse {
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let span = tracing::info_span!("request", %request_id, %method, %uri);

    async move {
        info!("Incoming request");

        for (name, value) in req.headers().iter() {
            // Never log credentials
            if name == "authorization" || name == "cookie" {
                continue;
            }
            match value.to_str() {
                Ok(value_str) => debug!("Header: {}: {}", name, value_str),
                Err(_) => debug!("Header: {}: (binary data)", name),
            }
        }

        let response = next.run(req).await;

        let status = response.status();
        if status.is_server_error() {
            error!("Response status: {}", status);
        } else {
            info!("Response status: {}", status);
        }
        response
    }
    .instrument(span)
    .await
}
