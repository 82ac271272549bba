use super::super::error::ApiError;
use super::super::state::ApiState;
use axum::extract::State;
use axum::Json;
use log::{info, warn};
use regsync_core::domain::{DelegationActionResult, DelegationReport, ReconciliationResult, SignedRegistration};
use std::sync::Arc;

pub async fn handle_registrations(
    State(state): State<Arc<ApiState>>,
    Json(intents): Json<Vec<SignedRegistration>>,
) -> Result<Json<Vec<ReconciliationResult>>, ApiError> {
    let received = intents.len();
    info!("registrations received count={}", received);
    match state.engine.process_registrations(intents).await {
        Ok(results) => {
            state.metrics.inc_http_request("registrations", "ok");
            state.metrics.observe_results(&results);
            Ok(Json(results))
        }
        Err(err) => {
            warn!("registrations call failed received={} code={:?} error={}", received, err.code(), err);
            state.metrics.inc_http_request("registrations", "error");
            Err(ApiError(err))
        }
    }
}

pub async fn handle_claims(
    State(state): State<Arc<ApiState>>,
    Json(reports): Json<Vec<DelegationReport>>,
) -> Result<Json<Vec<DelegationActionResult>>, ApiError> {
    info!("claims received count={}", reports.len());
    let outcome = state.engine.process_claims(reports).await;
    finish_action(&state, "claims", outcome)
}

pub async fn handle_exits(
    State(state): State<Arc<ApiState>>,
    Json(reports): Json<Vec<DelegationReport>>,
) -> Result<Json<Vec<DelegationActionResult>>, ApiError> {
    info!("exits received count={}", reports.len());
    let outcome = state.engine.process_exits(reports).await;
    finish_action(&state, "exits", outcome)
}

fn finish_action(
    state: &ApiState,
    route: &str,
    outcome: regsync_core::Result<Vec<DelegationActionResult>>,
) -> Result<Json<Vec<DelegationActionResult>>, ApiError> {
    match outcome {
        Ok(results) => {
            state.metrics.inc_http_request(route, "ok");
            Ok(Json(results))
        }
        Err(err) => {
            warn!("delegation action call failed route={} code={:?} error={}", route, err.code(), err);
            state.metrics.inc_http_request(route, "error");
            Err(ApiError(err))
        }
    }
}
