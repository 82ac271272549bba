//! Hooks fired as identities are classified, omitted and dispatched.

use crate::domain::{Authority, DelegationAction, DispatchStatus, IdentityState, TransactionOutcome};
use crate::foundation::BlsPublicKey;
use log::trace;
use std::sync::Arc;

/// Hooks for metrics and auditing around a reconciliation call. All methods default to no-ops.
pub trait ReconciliationObserver: Send + Sync {
    fn on_identity_classified(&self, _pubkey: &BlsPublicKey, _state: &IdentityState) {}
    fn on_identity_omitted(&self, _pubkey: &BlsPublicKey, _reason: &str) {}
    fn on_dispatch(&self, _authority: Authority, _identities: usize, _status: &DispatchStatus) {}
    fn on_delegation_action(&self, _action: DelegationAction, _outcome: &TransactionOutcome) {}
}

pub struct NoopObserver;

impl ReconciliationObserver for NoopObserver {}

pub struct CompositeObserver {
    observers: Vec<Arc<dyn ReconciliationObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self { observers: Vec::new() }
    }

    pub fn add_observer(&mut self, observer: Arc<dyn ReconciliationObserver>) {
        self.observers.push(observer);
    }
}

impl Default for CompositeObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconciliationObserver for CompositeObserver {
    fn on_identity_classified(&self, pubkey: &BlsPublicKey, state: &IdentityState) {
        trace!("on_identity_classified dispatch observer_count={} pubkey={}", self.observers.len(), pubkey);
        for observer in &self.observers {
            observer.on_identity_classified(pubkey, state);
        }
    }

    fn on_identity_omitted(&self, pubkey: &BlsPublicKey, reason: &str) {
        for observer in &self.observers {
            observer.on_identity_omitted(pubkey, reason);
        }
    }

    fn on_dispatch(&self, authority: Authority, identities: usize, status: &DispatchStatus) {
        for observer in &self.observers {
            observer.on_dispatch(authority, identities, status);
        }
    }

    fn on_delegation_action(&self, action: DelegationAction, outcome: &TransactionOutcome) {
        for observer in &self.observers {
            observer.on_delegation_action(action, outcome);
        }
    }
}
