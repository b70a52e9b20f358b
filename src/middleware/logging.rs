//! Request logging middleware

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{error, info, warn};

/// Log method, path, status and latency of every request
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let latency_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        error!(%method, %path, status = status.as_u16(), latency_ms, "Request failed");
    } else if status.is_client_error() {
        warn!(%method, %path, status = status.as_u16(), latency_ms, "Request rejected");
    } else {
        info!(%method, %path, status = status.as_u16(), latency_ms, "Request completed");
    }

    response
}
