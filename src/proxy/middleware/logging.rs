// Request logging middleware
use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tag every request with an id and log method, uri, status and latency
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    let method = request.method().clone();
    let uri = request.uri().clone();
    let started = Instant::now();

    tracing::info!("Request [{}]: {} {}", request_id, method, uri);

    let mut response = next.run(request).await;

    tracing::info!(
        "Response [{}]: {} {} -> {} ({} ms)",
        request_id,
        method,
        uri.path(),
        response.status().as_u16(),
        started.elapsed().as_millis()
    );

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
