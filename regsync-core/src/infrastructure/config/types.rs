use crate::foundation::{
    RegsyncError, Result, DEFAULT_CONFIRMATION_TIMEOUT_SECS, DEFAULT_EXCLUSION_POLL_SECS, DEFAULT_STATUS_CHUNK_SIZE,
    MAX_IDENTITIES_PER_TRANSACTION, MULTICALL3_ADDRESS, RECEIPT_POLL_INTERVAL_MS,
};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub(crate) const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";
pub(crate) const DEFAULT_HTTP_LISTEN_ADDR: &str = "127.0.0.1:8090";
pub(crate) const DEFAULT_MAX_GAS_PRICE_GWEI: u64 = 200;
pub(crate) const DEFAULT_SIGNER_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub delegation: DelegationConfig,
    #[serde(default)]
    pub signing: SigningConfig,
    #[serde(default)]
    pub remote_signer: RemoteSignerConfig,
    #[serde(default)]
    pub secondary_signer: SecondarySignerConfig,
    #[serde(default)]
    pub exclusions: ExclusionsConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Execution node and transaction policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default)]
    pub rpc_url: String,
    /// Chain every authority and every signed transaction is bound to.
    #[serde(default)]
    pub chain_id: u64,
    /// Ceiling for the node's suggested gas price; a higher suggestion fails the attempt.
    #[serde(default)]
    pub max_gas_price_gwei: u64,
    #[serde(default)]
    pub receipt_poll_interval_ms: u64,
    #[serde(default)]
    pub confirmation_timeout_secs: u64,
    #[serde(default)]
    pub multicall_address: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            chain_id: 0,
            max_gas_price_gwei: DEFAULT_MAX_GAS_PRICE_GWEI,
            receipt_poll_interval_ms: RECEIPT_POLL_INTERVAL_MS,
            confirmation_timeout_secs: DEFAULT_CONFIRMATION_TIMEOUT_SECS,
            multicall_address: MULTICALL3_ADDRESS.to_string(),
        }
    }
}

impl ChainConfig {
    pub fn max_gas_price_wei(&self) -> u128 {
        u128::from(self.max_gas_price_gwei) * 1_000_000_000
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn multicall_address(&self) -> Result<Address> {
        parse_address("chain.multicall_address", &self.multicall_address)
    }
}

/// Proposer registry contract.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub address: String,
    /// Defaults to `chain.chain_id` when unset.
    #[serde(default)]
    pub chain_id: u64,
    /// Payout recipient substituted into intents whose fee recipient differs.
    #[serde(default)]
    pub payout_recipient_override: Option<String>,
}

impl RegistryConfig {
    pub fn contract_address(&self) -> Result<Address> {
        if self.address.trim().is_empty() {
            return Err(RegsyncError::MissingContractAddress("registry.address".to_string()));
        }
        parse_address("registry.address", &self.address)
    }

    pub fn payout_override(&self) -> Result<Option<Address>> {
        match self.payout_recipient_override.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => parse_address("registry.payout_recipient_override", value).map(Some),
            None => Ok(None),
        }
    }
}

/// Native delegation ledger. Disabled unless `enabled = true`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DelegationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub address: String,
    /// Defaults to `chain.chain_id` when unset.
    #[serde(default)]
    pub chain_id: u64,
}

impl DelegationConfig {
    /// `Ok(None)` when the ledger is disabled.
    pub fn contract_address(&self) -> Result<Option<Address>> {
        if !self.enabled {
            return Ok(None);
        }
        if self.address.trim().is_empty() {
            return Err(RegsyncError::MissingContractAddress("delegation.address".to_string()));
        }
        parse_address("delegation.address", &self.address).map(Some)
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct SigningConfig {
    /// Hex secp256k1 key of the engine's representative account. Usually supplied as
    /// `REGSYNC_SIGNING__PRIVATE_KEY`.
    #[serde(default)]
    pub private_key: String,
}

impl fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shown = if self.private_key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("SigningConfig").field("private_key", &shown).finish()
    }
}

/// Web3Signer-compatible BLS remote signer used to re-sign intents with the payout override.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteSignerConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for RemoteSignerConfig {
    fn default() -> Self {
        Self { url: None, timeout_secs: DEFAULT_SIGNER_TIMEOUT_SECS }
    }
}

/// Signature swapper producing the representative's ECDSA authorization for delegation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SecondarySignerConfig {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for SecondarySignerConfig {
    fn default() -> Self {
        Self { url: None, timeout_secs: DEFAULT_SIGNER_TIMEOUT_SECS }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExclusionsConfig {
    /// JSON exclusion list; no exclusions apply when unset.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub poll_interval_secs: u64,
}

impl Default for ExclusionsConfig {
    fn default() -> Self {
        Self { path: None, poll_interval_secs: DEFAULT_EXCLUSION_POLL_SECS }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub listen_addr: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { enabled: true, listen_addr: DEFAULT_HTTP_LISTEN_ADDR.to_string() }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Identities per reconciliation chunk, and so per transaction.
    #[serde(default)]
    pub max_batch_size: usize,
    /// Identities per multicall status read before any size-limit splitting.
    #[serde(default)]
    pub status_chunk_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { max_batch_size: MAX_IDENTITIES_PER_TRANSACTION, status_chunk_size: DEFAULT_STATUS_CHUNK_SIZE }
    }
}

pub(crate) fn parse_address(field: &str, value: &str) -> Result<Address> {
    Address::from_str(value.trim()).map_err(|err| RegsyncError::ConfigError(format!("invalid {field} '{}': {err}", value.trim())))
}
