use log::debug;
use prometheus::{Encoder, IntCounterVec, Registry, TextEncoder};
use regsync_core::application::ReconciliationObserver;
use regsync_core::domain::{Authority, DelegationAction, DispatchStatus, IdentityState, ReconciliationResult, TransactionOutcome};
use regsync_core::foundation::BlsPublicKey;
use regsync_core::{RegsyncError, Result};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub uptime: Duration,
    pub identities_classified: u64,
    pub identities_omitted: u64,
    pub transactions_confirmed: u64,
    pub transactions_failed: u64,
    pub transactions_unknown: u64,
    pub http_ok: u64,
    pub http_error: u64,
}

pub struct Metrics {
    registry: Registry,
    identities_classified_total: IntCounterVec,
    identities_omitted_total: IntCounterVec,
    registrations_processed_total: IntCounterVec,
    transactions_total: IntCounterVec,
    dispatched_identities_total: IntCounterVec,
    delegation_actions_total: IntCounterVec,
    http_requests_total: IntCounterVec,
    started_at: Instant,
    identities_classified: AtomicU64,
    identities_omitted: AtomicU64,
    transactions_confirmed: AtomicU64,
    transactions_failed: AtomicU64,
    transactions_unknown: AtomicU64,
    http_ok: AtomicU64,
    http_error: AtomicU64,
}

fn metrics_err(err: impl ToString) -> RegsyncError {
    RegsyncError::Message(err.to_string())
}

fn counter_vec(name: &str, help: &str, labels: &[&str]) -> Result<IntCounterVec> {
    IntCounterVec::new(prometheus::Opts::new(name, help), labels).map_err(metrics_err)
}

fn dispatch_label(status: &DispatchStatus) -> &'static str {
    match status {
        DispatchStatus::NotRequired => "not_required",
        DispatchStatus::AlreadySatisfied => "already_satisfied",
        DispatchStatus::Confirmed { .. } => "confirmed",
        DispatchStatus::Failed { .. } => "failed",
        DispatchStatus::Unknown { .. } => "unknown",
    }
}

fn outcome_label(outcome: &TransactionOutcome) -> &'static str {
    match outcome {
        TransactionOutcome::Confirmed { .. } => "confirmed",
        TransactionOutcome::Failed { .. } => "failed",
        TransactionOutcome::Unknown { .. } => "unknown",
    }
}

impl Metrics {
    pub fn new() -> Result<Self> {
        debug!("initializing prometheus metrics");
        let registry = Registry::new();
        let identities_classified_total =
            counter_vec("regsync_identities_classified_total", "Identities classified by state", &["state"])?;
        let identities_omitted_total =
            counter_vec("regsync_identities_omitted_total", "Identities left out of results by reason", &["reason"])?;
        let registrations_processed_total = counter_vec(
            "regsync_registrations_processed_total",
            "Reported registration outcomes by authority and outcome",
            &["authority", "outcome"],
        )?;
        let transactions_total =
            counter_vec("regsync_transactions_total", "Batch transactions by authority and result", &["authority", "result"])?;
        let dispatched_identities_total =
            counter_vec("regsync_dispatched_identities_total", "Identities carried by batch transactions", &["authority"])?;
        let delegation_actions_total =
            counter_vec("regsync_delegation_actions_total", "Claim and exit transactions by result", &["action", "result"])?;
        let http_requests_total = counter_vec("regsync_http_requests_total", "HTTP requests by route and status", &["route", "status"])?;

        for collector in [
            &identities_classified_total,
            &identities_omitted_total,
            &registrations_processed_total,
            &transactions_total,
            &dispatched_identities_total,
            &delegation_actions_total,
            &http_requests_total,
        ] {
            registry.register(Box::new(collector.clone())).map_err(metrics_err)?;
        }

        let out = Self {
            registry,
            identities_classified_total,
            identities_omitted_total,
            registrations_processed_total,
            transactions_total,
            dispatched_identities_total,
            delegation_actions_total,
            http_requests_total,
            started_at: Instant::now(),
            identities_classified: AtomicU64::new(0),
            identities_omitted: AtomicU64::new(0),
            transactions_confirmed: AtomicU64::new(0),
            transactions_failed: AtomicU64::new(0),
            transactions_unknown: AtomicU64::new(0),
            http_ok: AtomicU64::new(0),
            http_error: AtomicU64::new(0),
        };
        debug!("prometheus metrics registered metric_count=7");
        Ok(out)
    }

    pub fn inc_http_request(&self, route: &str, status: &str) {
        self.http_requests_total.with_label_values(&[route, status]).inc();
        match status {
            "ok" => {
                self.http_ok.fetch_add(1, Ordering::Relaxed);
            }
            "error" => {
                self.http_error.fetch_add(1, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    /// Count every reported identity once per authority.
    pub fn observe_results(&self, results: &[ReconciliationResult]) {
        for result in results {
            for authority in [Authority::Registry, Authority::DelegationLedger] {
                let label = authority.to_string();
                self.registrations_processed_total.with_label_values(&[label.as_str(), dispatch_label(result.status(authority))]).inc();
            }
        }
    }

    fn record_transaction(&self, result: &str) {
        let counter = match result {
            "confirmed" => &self.transactions_confirmed,
            "failed" => &self.transactions_failed,
            "unknown" => &self.transactions_unknown,
            _ => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime: self.started_at.elapsed(),
            identities_classified: self.identities_classified.load(Ordering::Relaxed),
            identities_omitted: self.identities_omitted.load(Ordering::Relaxed),
            transactions_confirmed: self.transactions_confirmed.load(Ordering::Relaxed),
            transactions_failed: self.transactions_failed.load(Ordering::Relaxed),
            transactions_unknown: self.transactions_unknown.load(Ordering::Relaxed),
            http_ok: self.http_ok.load(Ordering::Relaxed),
            http_error: self.http_error.load(Ordering::Relaxed),
        }
    }

    pub fn encode(&self) -> Result<String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer).map_err(metrics_err)?;
        let output = String::from_utf8(buffer).map_err(metrics_err)?;
        Ok(output)
    }
}

impl ReconciliationObserver for Metrics {
    fn on_identity_classified(&self, _pubkey: &BlsPublicKey, state: &IdentityState) {
        self.identities_classified_total.with_label_values(&[state.label()]).inc();
        self.identities_classified.fetch_add(1, Ordering::Relaxed);
    }

    fn on_identity_omitted(&self, _pubkey: &BlsPublicKey, reason: &str) {
        self.identities_omitted_total.with_label_values(&[reason]).inc();
        self.identities_omitted.fetch_add(1, Ordering::Relaxed);
    }

    fn on_dispatch(&self, authority: Authority, identities: usize, status: &DispatchStatus) {
        let authority = authority.to_string();
        let result = dispatch_label(status);
        self.transactions_total.with_label_values(&[authority.as_str(), result]).inc();
        self.dispatched_identities_total.with_label_values(&[authority.as_str()]).inc_by(identities as u64);
        self.record_transaction(result);
    }

    fn on_delegation_action(&self, action: DelegationAction, outcome: &TransactionOutcome) {
        let result = outcome_label(outcome);
        self.delegation_actions_total.with_label_values(&[action.as_str(), result]).inc();
        self.record_transaction(result);
    }
}
