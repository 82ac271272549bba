//! Sends the registry batch, then the delegation batch, and maps each attempt to per-identity outcomes.

use crate::application::observer::ReconciliationObserver;
use crate::application::reconciler::{DelegationEntry, ReconciliationPlan, RegistryEntry};
use crate::domain::{Authority, DispatchStatus};
use crate::foundation::{RegsyncError, Result};
use crate::infrastructure::chain::{ChainGateway, TxAttempt};
use crate::infrastructure::contracts::{EcdsaSignature as SolEcdsaSignature, INativeDelegationLedger, IProposerRegistry};
use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use log::{info, warn};
use std::sync::Arc;

pub fn encode_registry_batch(entries: &[RegistryEntry]) -> Bytes {
    IProposerRegistry::batchRegisterProposersCall {
        blsPublicKeys: entries.iter().map(|entry| entry.pubkey.to_bytes()).collect(),
        payoutRecipients: entries.iter().map(|entry| entry.payout_recipient).collect(),
        gasLimits: entries.iter().map(|entry| entry.gas_limit).collect(),
        timestamps: entries.iter().map(|entry| entry.timestamp).collect(),
        blsSignatures: entries.iter().map(|entry| entry.signature.to_bytes()).collect(),
    }
    .abi_encode()
    .into()
}

pub fn encode_delegation_batch(entries: &[DelegationEntry]) -> Bytes {
    INativeDelegationLedger::batchNativeDelegateCall {
        blsPublicKeys: entries.iter().map(|entry| entry.pubkey.to_bytes()).collect(),
        payoutRecipients: entries.iter().map(|entry| entry.payout_recipient).collect(),
        representativeSignatures: entries.iter().map(|entry| SolEcdsaSignature::from(entry.signature)).collect(),
        registeredInSameBatch: entries.iter().map(|entry| entry.registered_in_same_batch).collect(),
    }
    .abi_encode()
    .into()
}

/// Map a finished attempt onto the per-identity status vocabulary.
pub fn attempt_status(attempt: &TxAttempt) -> DispatchStatus {
    match (&attempt.result, attempt.tx_hash) {
        (Ok(_), Some(tx_hash)) => DispatchStatus::Confirmed { tx_hash },
        (Ok(_), None) => DispatchStatus::Unknown { tx_hash: None, reason: "confirmed without a transaction hash".to_string() },
        (Err(err), tx_hash) if err.is_ambiguous() => DispatchStatus::Unknown { tx_hash, reason: err.to_string() },
        (Err(err), tx_hash) => DispatchStatus::Failed { tx_hash, reason: err.to_string() },
    }
}

/// Sends at most one transaction per authority for a reconciled chunk.
pub struct Dispatcher {
    gateway: Arc<ChainGateway>,
    registry: Address,
    delegation: Option<Address>,
}

impl Dispatcher {
    pub fn new(gateway: Arc<ChainGateway>, registry: Address, delegation: Option<Address>) -> Self {
        Self { gateway, registry, delegation }
    }

    pub fn delegation_address(&self) -> Option<Address> {
        self.delegation
    }

    /// Registry batch first, then the delegation batch. A failure of one never cancels the other.
    pub async fn dispatch(&self, plan: &mut ReconciliationPlan, observer: &dyn ReconciliationObserver) -> Result<()> {
        if !plan.registry_batch.is_empty() {
            let status = self.send(Authority::Registry, self.registry, encode_registry_batch(&plan.registry_batch), plan.registry_batch.len()).await;
            observer.on_dispatch(Authority::Registry, plan.registry_batch.len(), &status);
            let pubkeys: Vec<_> = plan.registry_batch.iter().map(|entry| entry.pubkey).collect();
            plan.apply_status(Authority::Registry, &pubkeys, &status);
        }

        if !plan.delegation_batch.is_empty() {
            let ledger = self.delegation.ok_or_else(|| RegsyncError::MissingContractAddress("delegation.address".to_string()))?;
            let status = self
                .send(Authority::DelegationLedger, ledger, encode_delegation_batch(&plan.delegation_batch), plan.delegation_batch.len())
                .await;
            observer.on_dispatch(Authority::DelegationLedger, plan.delegation_batch.len(), &status);
            let pubkeys: Vec<_> = plan.delegation_batch.iter().map(|entry| entry.pubkey).collect();
            plan.apply_status(Authority::DelegationLedger, &pubkeys, &status);
        }
        Ok(())
    }

    async fn send(&self, authority: Authority, to: Address, data: Bytes, identities: usize) -> DispatchStatus {
        info!("dispatching batch authority={} identities={} calldata_bytes={}", authority, identities, data.len());
        let attempt = self.gateway.send_and_confirm(&authority.to_string(), to, data).await;
        let status = attempt_status(&attempt);
        match &status {
            DispatchStatus::Confirmed { tx_hash } => {
                info!("batch confirmed authority={} identities={} tx_hash={}", authority, identities, tx_hash)
            }
            DispatchStatus::Unknown { tx_hash, reason } => warn!(
                "batch outcome unknown; re-read authority status before retrying authority={} identities={} tx_hash={:?} reason={}",
                authority, identities, tx_hash, reason
            ),
            DispatchStatus::Failed { tx_hash, reason } => {
                warn!("batch failed authority={} identities={} tx_hash={:?} reason={}", authority, identities, tx_hash, reason)
            }
            DispatchStatus::NotRequired | DispatchStatus::AlreadySatisfied => {}
        }
        status
    }
}
