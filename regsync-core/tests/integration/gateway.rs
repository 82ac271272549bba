use crate::fixtures::*;
use alloy::primitives::Bytes;
use regsync_core::domain::TxPhase;
use regsync_core::infrastructure::chain::{ChainGateway, GatewaySettings};
use regsync_core::RegsyncError;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

fn settings(confirmation_timeout: Duration) -> GatewaySettings {
    GatewaySettings {
        chain_id: TEST_CHAIN_ID,
        max_gas_price_wei: 100_000_000_000,
        receipt_poll_interval: Duration::from_millis(5),
        confirmation_timeout,
        multicall_address: MULTICALL_ADDRESS,
    }
}

#[tokio::test]
async fn test_verify_chain_id_when_node_serves_other_chain_then_mismatch() {
    let node = Arc::new(MockExecutionNode::new());
    node.set_chain_id(1);
    let gateway = ChainGateway::new(node, test_signer(), settings(Duration::from_secs(1)));

    let err = gateway.verify_chain_id().await.expect_err("mismatch");

    assert!(matches!(err, RegsyncError::ChainIdMismatch { expected: TEST_CHAIN_ID, actual: 1, .. }));
}

#[tokio::test]
async fn test_verify_chain_id_when_matching_then_ok() {
    let node = Arc::new(MockExecutionNode::new());
    let gateway = ChainGateway::new(node, test_signer(), settings(Duration::from_secs(1)));

    gateway.verify_chain_id().await.expect("same chain");
}

#[tokio::test]
async fn test_send_and_confirm_when_mined_then_fee_fields_follow_policy() {
    let node = Arc::new(MockExecutionNode::new());
    let gateway = ChainGateway::new(node.clone(), test_signer(), settings(Duration::from_secs(1)));

    let first = gateway.send_and_confirm("registry", REGISTRY_ADDRESS, Bytes::from_static(&[1, 2, 3])).await;
    let second = gateway.send_and_confirm("registry", REGISTRY_ADDRESS, Bytes::from_static(&[4])).await;

    assert!(first.result.expect("first confirmed").success);
    assert_eq!(first.phase, TxPhase::Confirmed);
    assert!(second.result.is_ok());

    let sent = node.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(first.tx_hash, Some(sent[0].hash));
    assert_eq!(sent[0].chain_id, TEST_CHAIN_ID);
    assert_eq!(sent[0].gas_limit, TEST_GAS_ESTIMATE + TEST_GAS_ESTIMATE / 5);
    assert_eq!(sent[0].max_priority_fee_per_gas, TEST_TIP_WEI);
    assert_eq!(sent[0].max_fee_per_gas, TEST_GAS_PRICE_WEI + TEST_TIP_WEI);
    assert!(sent[0].max_fee_per_gas <= gateway.settings().max_gas_price_wei);
    assert_eq!(sent[0].input, Bytes::from_static(&[1, 2, 3]));
    assert_eq!((sent[0].nonce, sent[1].nonce), (0, 1));
}

#[tokio::test]
async fn test_send_and_confirm_when_gas_price_at_ceiling_then_max_fee_clamped() {
    let node = Arc::new(MockExecutionNode::new());
    node.set_gas_price(100_000_000_000, 2_000_000_000);
    let gateway = ChainGateway::new(node.clone(), test_signer(), settings(Duration::from_secs(1)));

    gateway.send_and_confirm("registry", REGISTRY_ADDRESS, Bytes::new()).await.result.expect("confirmed");

    let sent = node.sent();
    assert_eq!(sent[0].max_fee_per_gas, 100_000_000_000);
    assert_eq!(sent[0].max_priority_fee_per_gas, 2_000_000_000);
    assert!(sent[0].max_priority_fee_per_gas <= sent[0].max_fee_per_gas);
}

#[tokio::test]
async fn test_send_and_confirm_when_tip_exceeds_gas_price_then_tip_capped() {
    let node = Arc::new(MockExecutionNode::new());
    node.set_gas_price(1_000_000_000, 5_000_000_000);
    let gateway = ChainGateway::new(node.clone(), test_signer(), settings(Duration::from_secs(1)));

    gateway.send_and_confirm("registry", REGISTRY_ADDRESS, Bytes::new()).await.result.expect("confirmed");

    let sent = node.sent();
    assert_eq!(sent[0].max_priority_fee_per_gas, 1_000_000_000);
    assert_eq!(sent[0].max_fee_per_gas, 2_000_000_000);
}

#[tokio::test]
async fn test_send_and_confirm_when_rejected_then_send_failed() {
    let node = Arc::new(MockExecutionNode::new());
    node.fail_sends(SendFailure::Rejected("nonce too low".to_string()));
    let gateway = ChainGateway::new(node, test_signer(), settings(Duration::from_secs(1)));

    let attempt = gateway.send_and_confirm("registry", REGISTRY_ADDRESS, Bytes::new()).await;

    assert_eq!(attempt.phase, TxPhase::Failed);
    assert!(attempt.tx_hash.is_some());
    assert!(matches!(attempt.result, Err(RegsyncError::SendFailed { .. })));
}

#[tokio::test]
async fn test_send_and_confirm_when_already_known_then_confirmed() {
    let node = Arc::new(MockExecutionNode::new());
    node.fail_sends(SendFailure::AlreadyKnown);
    let gateway = ChainGateway::new(node, test_signer(), settings(Duration::from_secs(1)));

    let attempt = gateway.send_and_confirm("registry", REGISTRY_ADDRESS, Bytes::new()).await;

    assert_eq!(attempt.phase, TxPhase::Confirmed);
    assert!(attempt.result.is_ok());
}

#[tokio::test]
async fn test_send_and_confirm_when_broadcast_fails_but_node_holds_tx_pending_then_confirmed() {
    let node = Arc::new(MockExecutionNode::new());
    node.fail_sends(SendFailure::AlreadyKnown);
    node.set_receipt_mode(ReceiptMode::Withheld);
    let gateway = ChainGateway::new(node.clone(), test_signer(), settings(Duration::from_secs(5)));

    let miner = {
        let node = node.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            node.set_receipt_mode(ReceiptMode::Mined);
        })
    };
    let attempt = gateway.send_and_confirm("registry", REGISTRY_ADDRESS, Bytes::new()).await;
    miner.await.expect("miner task");

    assert_eq!(node.pending_lookups(), 1);
    assert_eq!(attempt.phase, TxPhase::Confirmed);
    assert!(attempt.result.expect("confirmed").success);
}

#[tokio::test]
async fn test_send_and_confirm_when_broadcast_fails_and_tx_never_mines_then_ambiguous() {
    let node = Arc::new(MockExecutionNode::new());
    node.fail_sends(SendFailure::AlreadyKnown);
    node.set_receipt_mode(ReceiptMode::Withheld);
    let gateway = ChainGateway::new(node.clone(), test_signer(), settings(Duration::from_millis(30)));

    let attempt = gateway.send_and_confirm("registry", REGISTRY_ADDRESS, Bytes::new()).await;

    assert_eq!(node.pending_lookups(), 1);
    assert_eq!(attempt.phase, TxPhase::Pending);
    assert!(matches!(attempt.result, Err(ref err) if err.is_ambiguous()));
}

#[tokio::test]
async fn test_wait_for_receipt_when_shutdown_signalled_then_cancelled_while_pending() {
    let node = Arc::new(MockExecutionNode::new());
    node.set_receipt_mode(ReceiptMode::Withheld);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let gateway = ChainGateway::new(node, test_signer(), settings(Duration::from_secs(30))).with_shutdown(shutdown_rx);

    let trigger = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown_tx.send(true).expect("receiver alive");
    });
    let attempt = tokio::time::timeout(
        Duration::from_secs(5),
        gateway.send_and_confirm("delegation_ledger", LEDGER_ADDRESS, Bytes::new()),
    )
    .await
    .expect("shutdown must end the wait");
    trigger.await.expect("trigger task");

    assert_eq!(attempt.phase, TxPhase::Pending);
    match attempt.result {
        Err(err @ RegsyncError::ConfirmationCancelled { .. }) => {
            assert!(err.is_ambiguous());
            assert!(err.to_string().contains("shutdown"));
        }
        other => panic!("expected cancelled wait, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wait_for_receipt_when_deadline_passes_then_cancelled() {
    let node = Arc::new(MockExecutionNode::new());
    node.set_receipt_mode(ReceiptMode::Withheld);
    let gateway = ChainGateway::new(node, test_signer(), settings(Duration::from_millis(30)));

    let attempt = gateway.send_and_confirm("registry", REGISTRY_ADDRESS, Bytes::new()).await;

    assert_eq!(attempt.phase, TxPhase::Pending);
    assert!(matches!(attempt.result, Err(RegsyncError::ConfirmationCancelled { ref reason, .. }) if reason == "confirmation timeout"));
}
