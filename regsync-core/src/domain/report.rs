use crate::foundation::{BlsPublicKey, EcdsaSignature};
use alloy::primitives::{B256, U256};
use serde::{Deserialize, Serialize};

/// Claim or exit request for one delegated identity.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DelegationReport {
    pub pubkey: BlsPublicKey,
    pub reported_balance: U256,
    pub signature: EcdsaSignature,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DelegationAction {
    Claim,
    Exit,
}

impl DelegationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Claim => "claim",
            Self::Exit => "exit",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TransactionOutcome {
    Confirmed { tx_hash: B256 },
    Failed { tx_hash: Option<B256>, reason: String },
    Unknown { tx_hash: Option<B256>, reason: String },
}

/// Per-identity result of a claim or exit call.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct DelegationActionResult {
    pub pubkey: BlsPublicKey,
    pub action: DelegationAction,
    pub outcome: TransactionOutcome,
}
