//! Remote signing capabilities consumed by the engine.

use crate::domain::{RegistrationMessage, SignedRegistration};
use crate::foundation::{BlsPublicKey, EcdsaSignature, Result};
use alloy::primitives::Address;
use async_trait::async_trait;
use std::collections::HashSet;

mod swapper;
mod web3signer;

pub use swapper::SignatureSwapperClient;
pub use web3signer::Web3SignerClient;

/// BLS signer holding validator keys; used to re-sign intents with an overridden fee recipient.
#[async_trait]
pub trait RemoteSigner: Send + Sync {
    async fn sign_registration(&self, message: &RegistrationMessage) -> Result<SignedRegistration>;
    async fn list_signable_keys(&self) -> Result<HashSet<BlsPublicKey>>;
}

/// Produces the representative-scoped ECDSA authorization the delegation ledger requires.
#[async_trait]
pub trait SecondarySigner: Send + Sync {
    async fn generate_secondary_signature(&self, registration: &SignedRegistration, representative: Address) -> Result<EcdsaSignature>;
}
