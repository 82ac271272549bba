use crate::service::metrics::Metrics;
use async_trait::async_trait;
use regsync_core::application::RegistrationEngine;
use regsync_core::domain::{DelegationActionResult, DelegationReport, ReconciliationResult, SignedRegistration};
use regsync_core::Result;
use std::sync::Arc;

/// What the HTTP front door needs from the engine.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    async fn process_registrations(&self, intents: Vec<SignedRegistration>) -> Result<Vec<ReconciliationResult>>;
    async fn process_claims(&self, reports: Vec<DelegationReport>) -> Result<Vec<DelegationActionResult>>;
    async fn process_exits(&self, reports: Vec<DelegationReport>) -> Result<Vec<DelegationActionResult>>;
}

#[async_trait]
impl RegistrationService for RegistrationEngine {
    async fn process_registrations(&self, intents: Vec<SignedRegistration>) -> Result<Vec<ReconciliationResult>> {
        RegistrationEngine::process_registrations(self, intents).await
    }

    async fn process_claims(&self, reports: Vec<DelegationReport>) -> Result<Vec<DelegationActionResult>> {
        RegistrationEngine::process_claims(self, reports).await
    }

    async fn process_exits(&self, reports: Vec<DelegationReport>) -> Result<Vec<DelegationActionResult>> {
        RegistrationEngine::process_exits(self, reports).await
    }
}

#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<dyn RegistrationService>,
    pub metrics: Arc<Metrics>,
    /// Largest accepted request body in bytes.
    pub body_limit: usize,
}
