use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, warn};
use uuid::Uuid;

/// Logs every `/api` request on the way in and its outcome on the way out.
/// The request and response pass through untouched.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started = Instant::now();

    info!(%request_id, %method, %path, "request received");

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    if status.is_server_error() {
        warn!(%request_id, %method, %path, status = status.as_u16(), elapsed_ms, "request failed");
    } else {
        info!(%request_id, %method, %path, status = status.as_u16(), elapsed_ms, "request completed");
    }

    response
}
