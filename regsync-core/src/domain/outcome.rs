use crate::domain::status::Authority;
use crate::foundation::{BlsPublicKey, EcdsaSignature};
use alloy::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

/// How one authority's part of the reconciliation ended for an identity.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DispatchStatus {
    /// No transaction was needed and the authority is not satisfied either (excluded or disabled).
    #[default]
    NotRequired,
    /// The authority already records the identity; no transaction was sent.
    AlreadySatisfied,
    Confirmed { tx_hash: B256 },
    Failed { tx_hash: Option<B256>, reason: String },
    /// The transaction may still land; authority status must be re-read before retrying.
    Unknown { tx_hash: Option<B256>, reason: String },
}

impl DispatchStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::AlreadySatisfied | Self::Confirmed { .. })
    }

    pub fn tx_hash(&self) -> Option<B256> {
        match self {
            Self::Confirmed { tx_hash } => Some(*tx_hash),
            Self::Failed { tx_hash, .. } | Self::Unknown { tx_hash, .. } => *tx_hash,
            Self::NotRequired | Self::AlreadySatisfied => None,
        }
    }
}

/// Caller-visible result for one identity of one `process_registrations` call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub pubkey: BlsPublicKey,
    pub representative: Address,
    pub payout_recipient: Address,
    pub secondary_signature: Option<EcdsaSignature>,
    pub registry_success: bool,
    pub delegation_success: bool,
    pub registry: DispatchStatus,
    pub delegation: DispatchStatus,
}

impl ReconciliationResult {
    pub fn new(pubkey: BlsPublicKey, representative: Address, payout_recipient: Address) -> Self {
        Self {
            pubkey,
            representative,
            payout_recipient,
            secondary_signature: None,
            registry_success: false,
            delegation_success: false,
            registry: DispatchStatus::NotRequired,
            delegation: DispatchStatus::NotRequired,
        }
    }

    /// Record an authority outcome and keep the success flag in sync with it.
    pub fn set_status(&mut self, authority: Authority, status: DispatchStatus) {
        let success = status.is_success();
        match authority {
            Authority::Registry => {
                self.registry = status;
                self.registry_success = success;
            }
            Authority::DelegationLedger => {
                self.delegation = status;
                self.delegation_success = success;
            }
        }
    }

    pub fn status(&self, authority: Authority) -> &DispatchStatus {
        match authority {
            Authority::Registry => &self.registry,
            Authority::DelegationLedger => &self.delegation,
        }
    }
}
