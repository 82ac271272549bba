//! Execution-node access.
//!
//! Everything the engine needs from the node goes through [`ExecutionRpc`] so the gateway and the
//! status reader can be driven by a scripted node in tests.

use crate::foundation::{RegsyncError, Result};
use alloy::primitives::{Address, Bytes, B256};
use async_trait::async_trait;

pub mod alloy_rpc;

pub use alloy_rpc::AlloyExecutionRpc;

/// Where a transaction stands according to the node's transaction pool / chain.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TxLookup {
    Pending,
    Mined { block_number: u64 },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReceiptSummary {
    pub success: bool,
    pub block_number: Option<u64>,
}

#[async_trait]
pub trait ExecutionRpc: Send + Sync {
    async fn chain_id(&self) -> Result<u64>;
    /// `eth_call` against the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes>;
    async fn gas_price(&self) -> Result<u128>;
    async fn max_priority_fee_per_gas(&self) -> Result<u128>;
    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> Result<u64>;
    async fn pending_nonce(&self, address: Address) -> Result<u64>;
    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256>;
    async fn transaction_status(&self, hash: B256) -> Result<Option<TxLookup>>;
    async fn transaction_receipt(&self, hash: B256) -> Result<Option<ReceiptSummary>>;
}

const SIZE_LIMIT_MARKERS: &[&str] = &[
    "response size",
    "response is too big",
    "too large",
    "payload too large",
    "exceeds the limit",
    "limit exceeded",
    "out of gas",
    "413",
];

/// Whether a node error means "ask for less": oversized responses and call-gas exhaustion of
/// an aggregate read both clear up when the batch is split.
pub fn is_size_limit_error(err: &RegsyncError) -> bool {
    let RegsyncError::NodeRpcError { details, .. } = err else {
        return false;
    };
    let details = details.to_ascii_lowercase();
    SIZE_LIMIT_MARKERS.iter().any(|marker| details.contains(marker))
}
