use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;
use tracing::{info, warn};

/// Middleware for logging all requests and responses
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let started = Instant::now();

    info!("Incoming request: {} {}", method, uri);

    let response = next.run(req).await;

    let status = response.status();
    if status.is_server_error() {
        warn!(
            "{} {} failed with {} in {:?}",
            method,
            uri,
            status,
            started.elapsed()
        );
    } else {
        info!("Response status: {} in {:?}", status, started.elapsed());
    }

    response
}
