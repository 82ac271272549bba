use super::handlers::health::{handle_health, handle_metrics};
use super::handlers::registrations::{handle_claims, handle_exits, handle_registrations};
use super::middleware::logging::logging_middleware;
use super::state::ApiState;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use log::{error, info};
use regsync_core::{RegsyncError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

/// Serve until `shutdown` flips to `true`.
pub async fn run_http_server(addr: SocketAddr, state: Arc<ApiState>, mut shutdown: watch::Receiver<bool>) -> Result<()> {
    info!("binding http server addr={}", addr);
    let app = build_router(state);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|err| RegsyncError::IoError { operation: format!("bind {addr}"), details: err.to_string() })?;
    info!("HTTP server ready and accepting connections addr={}", addr);
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(async move {
            while !*shutdown.borrow_and_update() {
                if shutdown.changed().await.is_err() {
                    break;
                }
            }
        })
        .await
        .map_err(|err| {
            error!("HTTP server terminated unexpectedly addr={} error={}", addr, err);
            RegsyncError::NetworkError(err.to_string())
        })
}

pub fn build_router(state: Arc<ApiState>) -> Router {
    let body_limit = state.body_limit;
    Router::new()
        .route("/api/v1/registrations", post(handle_registrations))
        .route("/api/v1/claims", post(handle_claims))
        .route("/api/v1/exits", post(handle_exits))
        .route("/health", get(handle_health))
        .route("/metrics", get(handle_metrics))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(axum::middleware::from_fn(logging_middleware))
        .with_state(state)
}
