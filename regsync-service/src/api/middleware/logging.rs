use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{debug, error, trace, warn};
use std::time::Instant;

fn content_length(headers: &axum::http::HeaderMap) -> u64 {
    headers
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0)
}

pub async fn logging_middleware(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let client_ip =
        req.extensions().get::<ConnectInfo<std::net::SocketAddr>>().map(|ConnectInfo(addr)| addr.ip().to_string()).unwrap_or_default();
    let request_body_size = content_length(req.headers());
    let start = Instant::now();

    let response = next.run(req).await;

    let duration = start.elapsed();
    let status = response.status();
    let response_body_size = content_length(response.headers());

    if matches!(path.as_str(), "/health" | "/metrics") {
        trace!(
            target: "http",
            "health check client_ip={} method={} path={} status={} duration_ms={}",
            client_ip,
            method,
            path,
            status.as_u16(),
            duration.as_millis()
        );
    } else if status.is_server_error() {
        error!(
            target: "http",
            "request failed client_ip={} method={} path={} status={} duration_ms={} request_body_size={} response_body_size={}",
            client_ip,
            method,
            path,
            status.as_u16(),
            duration.as_millis(),
            request_body_size,
            response_body_size
        );
    } else if status.is_client_error() {
        warn!(
            target: "http",
            "request rejected client_ip={} method={} path={} status={} duration_ms={} request_body_size={}",
            client_ip,
            method,
            path,
            status.as_u16(),
            duration.as_millis(),
            request_body_size
        );
    } else {
        debug!(
            target: "http",
            "request client_ip={} method={} path={} status={} duration_ms={} response_body_size={}",
            client_ip,
            method,
            path,
            status.as_u16(),
            duration.as_millis(),
            response_body_size
        );
    }

    response
}
