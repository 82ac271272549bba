//! Single funnel for everything that touches the execution node with the engine's key.
//!
//! Transactions move Built -> Signed -> Submitted -> Pending -> Confirmed | Failed. Only the
//! receipt wait honours cancellation; a cancelled or timed-out wait is ambiguous, never a failure.

use crate::domain::{TxLifecycle, TxPhase};
use crate::foundation::{RegsyncError, Result, GAS_LIMIT_HEADROOM_PERCENT};
use crate::infrastructure::rpc::{ExecutionRpc, ReceiptSummary};
use alloy::consensus::{SignableTransaction, TxEip1559, TxEnvelope};
use alloy::eips::eip2718::Encodable2718;
use alloy::network::TxSignerSync;
use alloy::primitives::{Address, Bytes, TxKind, B256, U256};
use alloy::signers::local::PrivateKeySigner;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::time::Instant;

#[derive(Clone, Debug)]
pub struct GatewaySettings {
    pub chain_id: u64,
    pub max_gas_price_wei: u128,
    pub receipt_poll_interval: Duration,
    pub confirmation_timeout: Duration,
    pub multicall_address: Address,
}

/// A signed, broadcast-ready EIP-1559 transaction.
#[derive(Clone, Debug)]
pub struct SignedTx {
    pub hash: B256,
    pub raw: Bytes,
    pub nonce: u64,
    pub gas_limit: u64,
}

/// Result of one send-and-confirm attempt. `tx_hash` is known as soon as the transaction is signed.
#[derive(Debug)]
pub struct TxAttempt {
    pub tx_hash: Option<B256>,
    pub phase: TxPhase,
    pub result: Result<ReceiptSummary>,
}

pub struct ChainGateway {
    rpc: Arc<dyn ExecutionRpc>,
    signer: PrivateKeySigner,
    settings: GatewaySettings,
    nonce_lock: Mutex<()>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl ChainGateway {
    pub fn new(rpc: Arc<dyn ExecutionRpc>, signer: PrivateKeySigner, settings: GatewaySettings) -> Self {
        Self { rpc, signer, settings, nonce_lock: Mutex::new(()), shutdown: None }
    }

    /// Receipt waits end early, as ambiguous, once `shutdown` flips to `true`.
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn signing_address(&self) -> Address {
        self.signer.address()
    }

    pub fn chain_id(&self) -> u64 {
        self.settings.chain_id
    }

    pub fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// The node must serve the chain every authority and transaction is bound to.
    pub async fn verify_chain_id(&self) -> Result<()> {
        let actual = self.rpc.chain_id().await?;
        if actual != self.settings.chain_id {
            return Err(RegsyncError::ChainIdMismatch {
                component: "execution_node".to_string(),
                expected: self.settings.chain_id,
                actual,
            });
        }
        info!("execution node chain id verified chain_id={} signer={}", actual, self.signing_address());
        Ok(())
    }

    pub async fn read(&self, to: Address, data: Bytes) -> Result<Bytes> {
        self.rpc.call(to, data).await
    }

    /// Built -> Signed: gas price ceiling, gas estimate, pending nonce, EIP-1559 signature.
    ///
    /// `max_fee_per_gas` is capped at the ceiling, so a suggestion right at the ceiling cannot pay more.
    pub async fn build_and_sign(&self, to: Address, data: Bytes, lifecycle: &mut TxLifecycle) -> Result<SignedTx> {
        let gas_price = self.rpc.gas_price().await?;
        if gas_price > self.settings.max_gas_price_wei {
            let err = RegsyncError::GasPriceTooHigh { suggested_wei: gas_price, max_wei: self.settings.max_gas_price_wei };
            lifecycle.fail(&err.to_string());
            return Err(err);
        }
        // Both fee caps stay within the ceiling.
        let suggested_tip = self.rpc.max_priority_fee_per_gas().await?.min(gas_price);
        let max_fee = gas_price.saturating_add(suggested_tip).min(self.settings.max_gas_price_wei);
        let tip = suggested_tip.min(max_fee);
        let from = self.signing_address();
        let estimate = self.rpc.estimate_gas(from, to, data.clone()).await?;
        let gas_limit = estimate.saturating_add(estimate.saturating_mul(GAS_LIMIT_HEADROOM_PERCENT) / 100);
        let nonce = self.rpc.pending_nonce(from).await?;

        let mut tx = TxEip1559 {
            chain_id: self.settings.chain_id,
            nonce,
            gas_limit,
            max_fee_per_gas: max_fee,
            max_priority_fee_per_gas: tip,
            to: TxKind::Call(to),
            value: U256::ZERO,
            access_list: Default::default(),
            input: data,
        };
        let signature = self.signer.sign_transaction_sync(&mut tx).map_err(|err| RegsyncError::SigningFailed(err.to_string()))?;
        let signed = tx.into_signed(signature);
        let hash = *signed.hash();
        let raw = Bytes::from(TxEnvelope::from(signed).encoded_2718());

        lifecycle.signed(hash)?;
        debug!(
            "transaction signed label={} tx_hash={} nonce={} gas_limit={} gas_price_wei={} max_fee_wei={} tip_wei={}",
            lifecycle.label(),
            hash,
            nonce,
            gas_limit,
            gas_price,
            max_fee,
            tip
        );
        Ok(SignedTx { hash, raw, nonce, gas_limit })
    }

    /// Signed -> Submitted. A send error is forgiven when the node already knows the hash.
    pub async fn submit(&self, tx: &SignedTx, lifecycle: &mut TxLifecycle) -> Result<B256> {
        match self.rpc.send_raw_transaction(tx.raw.clone()).await {
            Ok(hash) => {
                if hash != tx.hash {
                    warn!("node reported unexpected tx hash label={} expected={} got={}", lifecycle.label(), tx.hash, hash);
                }
            }
            Err(send_err) => {
                warn!("transaction broadcast failed; checking node by hash label={} tx_hash={} error={}", lifecycle.label(), tx.hash, send_err);
                match self.rpc.transaction_status(tx.hash).await {
                    Ok(Some(found)) => {
                        info!("transaction already known to node; treating as submitted label={} tx_hash={} state={:?}", lifecycle.label(), tx.hash, found);
                    }
                    Ok(None) | Err(_) => {
                        let err = RegsyncError::SendFailed { tx_hash: tx.hash.to_string(), details: send_err.to_string() };
                        lifecycle.fail(&err.to_string());
                        return Err(err);
                    }
                }
            }
        }
        lifecycle.advance(TxPhase::Submitted)?;
        Ok(tx.hash)
    }

    /// Submitted -> Pending -> Confirmed | Failed, polling at the configured interval.
    ///
    /// Node errors while polling are treated like "no receipt yet". Timeout and shutdown return
    /// [`RegsyncError::ConfirmationCancelled`] and leave the lifecycle in `Pending`.
    pub async fn wait_for_receipt(&self, hash: B256, lifecycle: &mut TxLifecycle) -> Result<ReceiptSummary> {
        if lifecycle.phase() == TxPhase::Submitted {
            lifecycle.advance(TxPhase::Pending)?;
        }
        let deadline = Instant::now() + self.settings.confirmation_timeout;
        let mut shutdown = self.shutdown.clone();

        loop {
            match self.rpc.transaction_receipt(hash).await {
                Ok(Some(receipt)) if receipt.success => {
                    lifecycle.advance(TxPhase::Confirmed)?;
                    return Ok(receipt);
                }
                Ok(Some(receipt)) => {
                    let err = RegsyncError::TransactionReverted { tx_hash: hash.to_string(), block_number: receipt.block_number };
                    lifecycle.fail(&err.to_string());
                    return Err(err);
                }
                Ok(None) => {}
                Err(err) => debug!("receipt poll failed; will retry label={} tx_hash={} error={}", lifecycle.label(), hash, err),
            }

            let now = Instant::now();
            if now >= deadline {
                warn!("confirmation wait timed out; outcome unknown label={} tx_hash={}", lifecycle.label(), hash);
                return Err(RegsyncError::ConfirmationCancelled { tx_hash: hash.to_string(), reason: "confirmation timeout".to_string() });
            }
            let wake = (now + self.settings.receipt_poll_interval).min(deadline);
            tokio::select! {
                _ = tokio::time::sleep_until(wake) => {}
                _ = wait_for_shutdown(&mut shutdown) => {
                    warn!("confirmation wait cancelled by shutdown; outcome unknown label={} tx_hash={}", lifecycle.label(), hash);
                    return Err(RegsyncError::ConfirmationCancelled { tx_hash: hash.to_string(), reason: "shutdown".to_string() });
                }
            }
        }
    }

    /// Full lifecycle for one call to `to`. The nonce lock covers build through broadcast.
    pub async fn send_and_confirm(&self, label: &str, to: Address, data: Bytes) -> TxAttempt {
        let mut lifecycle = TxLifecycle::new(label);
        let submitted = {
            let _nonce_guard = self.nonce_lock.lock().await;
            match self.build_and_sign(to, data, &mut lifecycle).await {
                Ok(tx) => self.submit(&tx, &mut lifecycle).await,
                Err(err) => Err(err),
            }
        };
        let result = match submitted {
            Ok(hash) => self.wait_for_receipt(hash, &mut lifecycle).await,
            Err(err) => {
                lifecycle.fail(&err.to_string());
                Err(err)
            }
        };
        TxAttempt { tx_hash: lifecycle.tx_hash(), phase: lifecycle.phase(), result }
    }
}

async fn wait_for_shutdown(shutdown: &mut Option<watch::Receiver<bool>>) {
    let Some(rx) = shutdown.as_mut() else {
        return std::future::pending().await;
    };
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            return std::future::pending().await;
        }
    }
}
