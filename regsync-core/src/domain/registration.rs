use crate::foundation::util::serde_quoted::u64_string;
use crate::foundation::{BlsPublicKey, BlsSignature};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// Builder-API `ValidatorRegistrationV1` message.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RegistrationMessage {
    pub fee_recipient: Address,
    #[serde(with = "u64_string")]
    pub gas_limit: u64,
    #[serde(with = "u64_string")]
    pub timestamp: u64,
    pub pubkey: BlsPublicKey,
}

/// Signed registration intent supplied by the caller. Never mutated; re-signing produces a new value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SignedRegistration {
    pub message: RegistrationMessage,
    pub signature: BlsSignature,
}

impl SignedRegistration {
    pub fn pubkey(&self) -> &BlsPublicKey {
        &self.message.pubkey
    }

    pub fn fee_recipient(&self) -> Address {
        self.message.fee_recipient
    }
}

/// A registration intent after the payout-recipient override policy has been applied.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PreparedRegistration {
    pub registration: SignedRegistration,
    /// Recipient written into the authority transactions.
    pub payout_recipient: Address,
    pub source: PayoutSource,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PayoutSource {
    /// Intent's own fee recipient.
    Intent,
    /// Override substituted without touching the BLS-signed message.
    Override,
    /// Override applied and the message re-signed by the remote signer.
    OverrideResigned,
}
