//! Per-chunk planning: classify every identity, gather secondary signatures for delegation
//! candidates, and lay out one batch per authority.

use crate::application::observer::ReconciliationObserver;
use crate::domain::{
    classify, Authority, DispatchStatus, ExclusionTable, IdentityState, PreparedRegistration, ReconciliationResult, StatusSnapshot,
};
use crate::foundation::{BlsPublicKey, BlsSignature, EcdsaSignature, RegsyncError, Result};
use crate::infrastructure::signers::SecondarySigner;
use alloy::primitives::Address;
use log::{debug, info, warn};

/// One identity's slot in the registry batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistryEntry {
    pub pubkey: BlsPublicKey,
    pub payout_recipient: Address,
    pub gas_limit: u64,
    pub timestamp: u64,
    pub signature: BlsSignature,
}

/// One identity's slot in the delegation batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DelegationEntry {
    pub pubkey: BlsPublicKey,
    pub payout_recipient: Address,
    pub signature: EcdsaSignature,
    pub registered_in_same_batch: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ReconciliationPlan {
    /// Reported identities in input order.
    pub results: Vec<ReconciliationResult>,
    pub registry_batch: Vec<RegistryEntry>,
    pub delegation_batch: Vec<DelegationEntry>,
}

impl ReconciliationPlan {
    pub fn is_noop(&self) -> bool {
        self.registry_batch.is_empty() && self.delegation_batch.is_empty()
    }

    /// Stamp `status` on every result whose identity is in `pubkeys`.
    pub fn apply_status<'a>(&mut self, authority: Authority, pubkeys: impl IntoIterator<Item = &'a BlsPublicKey>, status: &DispatchStatus) {
        let targets: std::collections::HashSet<&BlsPublicKey> = pubkeys.into_iter().collect();
        for result in self.results.iter_mut().filter(|result| targets.contains(&result.pubkey)) {
            result.set_status(authority, status.clone());
        }
    }
}

pub struct Reconciler<'a> {
    secondary_signer: Option<&'a dyn SecondarySigner>,
    observer: &'a dyn ReconciliationObserver,
}

impl<'a> Reconciler<'a> {
    pub fn new(secondary_signer: Option<&'a dyn SecondarySigner>, observer: &'a dyn ReconciliationObserver) -> Self {
        Self { secondary_signer, observer }
    }

    /// Identities are evaluated one at a time against a single status snapshot and a single
    /// exclusion snapshot. Per-identity problems omit the identity; they never fail the call.
    pub async fn reconcile(
        &self,
        intents: &[PreparedRegistration],
        exclusions: &ExclusionTable,
        signing_address: Address,
        statuses: &StatusSnapshot,
    ) -> Result<ReconciliationPlan> {
        let mut plan = ReconciliationPlan::default();

        for prepared in intents {
            let pubkey = *prepared.registration.pubkey();
            let status = statuses.identity(&pubkey);
            let state = classify(&status, &exclusions.entry(&pubkey), signing_address);
            self.observer.on_identity_classified(&pubkey, &state);
            debug!("identity classified pubkey={} state={}", pubkey, state.label());

            match state {
                IdentityState::Excluded => {
                    info!("identity excluded from registry registration; skipping pubkey={}", pubkey);
                    self.observer.on_identity_omitted(&pubkey, "excluded");
                    continue;
                }
                IdentityState::Unauthorized { representative } => {
                    let err = RegsyncError::not_authorized(pubkey, representative, signing_address);
                    warn!("identity registered under another representative; skipping error={}", err);
                    self.observer.on_identity_omitted(&pubkey, "unauthorized");
                    continue;
                }
                IdentityState::Inconsistent => {
                    warn!("identity delegated at ledger but unregistered at registry; skipping pubkey={}", pubkey);
                    self.observer.on_identity_omitted(&pubkey, "inconsistent");
                    continue;
                }
                _ => {}
            }

            let (representative, payout_recipient) = match state {
                IdentityState::RegistryOnly { representative, payout_recipient, .. }
                | IdentityState::FullyDelegated { representative, payout_recipient } => (representative, payout_recipient),
                _ => (signing_address, prepared.payout_recipient),
            };

            let secondary_signature = if state.needs_delegation() {
                match self.secondary_signature(prepared, representative).await {
                    Ok(signature) => Some(signature),
                    Err(err) => {
                        warn!("secondary signature failed; omitting identity pubkey={} error={}", pubkey, err);
                        self.observer.on_identity_omitted(&pubkey, "secondary_signature");
                        continue;
                    }
                }
            } else {
                None
            };

            let mut result = ReconciliationResult::new(pubkey, representative, payout_recipient);
            result.secondary_signature = secondary_signature;

            if state.needs_registry_registration() {
                let message = &prepared.registration.message;
                plan.registry_batch.push(RegistryEntry {
                    pubkey,
                    payout_recipient,
                    gas_limit: message.gas_limit,
                    timestamp: message.timestamp,
                    signature: prepared.registration.signature,
                });
            } else {
                result.set_status(Authority::Registry, DispatchStatus::AlreadySatisfied);
            }

            if let Some(signature) = secondary_signature {
                plan.delegation_batch.push(DelegationEntry {
                    pubkey,
                    payout_recipient,
                    signature,
                    registered_in_same_batch: state.needs_registry_registration(),
                });
            } else if matches!(state, IdentityState::FullyDelegated { .. }) {
                result.set_status(Authority::DelegationLedger, DispatchStatus::AlreadySatisfied);
            }

            plan.results.push(result);
        }

        info!(
            "reconciliation planned identities={} reported={} registry_batch={} delegation_batch={}",
            intents.len(),
            plan.results.len(),
            plan.registry_batch.len(),
            plan.delegation_batch.len()
        );
        Ok(plan)
    }

    async fn secondary_signature(&self, prepared: &PreparedRegistration, representative: Address) -> Result<EcdsaSignature> {
        let signer = self.secondary_signer.ok_or_else(|| RegsyncError::SecondarySignatureFailed {
            pubkey: prepared.registration.pubkey().to_string(),
            details: "no secondary signer configured".to_string(),
        })?;
        signer.generate_secondary_signature(&prepared.registration, representative).await
    }
}
