use crate::foundation::{RegsyncError, Result};
use crate::infrastructure::rpc::{ExecutionRpc, ReceiptSummary, TxLookup};
use alloy::network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{Provider, RootProvider};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use log::debug;

/// JSON-RPC over HTTP to an execution node.
pub struct AlloyExecutionRpc {
    provider: RootProvider<Ethereum>,
}

impl AlloyExecutionRpc {
    pub fn connect(url: &str) -> Result<Self> {
        let parsed = url::Url::parse(url.trim()).map_err(|err| RegsyncError::ConfigError(format!("invalid execution rpc url: {err}")))?;
        debug!("execution rpc client created host={}", parsed.host_str().unwrap_or("<none>"));
        Ok(Self { provider: RootProvider::new_http(parsed) })
    }
}

#[async_trait]
impl ExecutionRpc for AlloyExecutionRpc {
    async fn chain_id(&self) -> Result<u64> {
        self.provider.get_chain_id().await.map_err(|err| RegsyncError::node_rpc("eth_chainId", err))
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        self.provider.call(tx).await.map_err(|err| RegsyncError::node_rpc("eth_call", err))
    }

    async fn gas_price(&self) -> Result<u128> {
        self.provider.get_gas_price().await.map_err(|err| RegsyncError::node_rpc("eth_gasPrice", err))
    }

    async fn max_priority_fee_per_gas(&self) -> Result<u128> {
        self.provider.get_max_priority_fee_per_gas().await.map_err(|err| RegsyncError::node_rpc("eth_maxPriorityFeePerGas", err))
    }

    async fn estimate_gas(&self, from: Address, to: Address, data: Bytes) -> Result<u64> {
        let tx = TransactionRequest::default().with_from(from).with_to(to).with_input(data);
        self.provider.estimate_gas(tx).await.map_err(|err| RegsyncError::node_rpc("eth_estimateGas", err))
    }

    async fn pending_nonce(&self, address: Address) -> Result<u64> {
        self.provider
            .get_transaction_count(address)
            .pending()
            .await
            .map_err(|err| RegsyncError::node_rpc("eth_getTransactionCount", err))
    }

    async fn send_raw_transaction(&self, raw: Bytes) -> Result<B256> {
        let pending =
            self.provider.send_raw_transaction(&raw).await.map_err(|err| RegsyncError::node_rpc("eth_sendRawTransaction", err))?;
        Ok(*pending.tx_hash())
    }

    async fn transaction_status(&self, hash: B256) -> Result<Option<TxLookup>> {
        let tx = self
            .provider
            .get_transaction_by_hash(hash)
            .await
            .map_err(|err| RegsyncError::node_rpc("eth_getTransactionByHash", err))?;
        Ok(tx.map(|tx| match tx.block_number {
            Some(block_number) => TxLookup::Mined { block_number },
            None => TxLookup::Pending,
        }))
    }

    async fn transaction_receipt(&self, hash: B256) -> Result<Option<ReceiptSummary>> {
        let receipt = self
            .provider
            .get_transaction_receipt(hash)
            .await
            .map_err(|err| RegsyncError::node_rpc("eth_getTransactionReceipt", err))?;
        Ok(receipt.map(|receipt| ReceiptSummary { success: receipt.status(), block_number: receipt.block_number }))
    }
}
