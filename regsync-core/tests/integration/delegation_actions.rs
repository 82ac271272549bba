use crate::fixtures::*;
use alloy::primitives::{B256, U256};
use alloy::sol_types::SolCall;
use regsync_core::domain::{DelegationAction, DelegationReport, TransactionOutcome};
use regsync_core::foundation::EcdsaSignature;
use regsync_core::infrastructure::contracts::INativeDelegationLedger;
use regsync_core::RegsyncError;

fn report(index: u32, balance: u64) -> DelegationReport {
    DelegationReport {
        pubkey: test_pubkey(index),
        reported_balance: U256::from(balance),
        signature: EcdsaSignature::new(28, B256::repeat_byte(0x0a), B256::repeat_byte(0x0b)),
    }
}

#[tokio::test]
async fn test_process_claims_when_ledger_disabled_then_config_error() {
    let harness = HarnessBuilder::default().without_delegation().build();

    let err = harness.engine.process_claims(vec![report(1, 32)]).await.expect_err("ledger disabled");

    assert!(matches!(err, RegsyncError::ConfigError(_)));
    assert_eq!(harness.node.rpc_calls(), 0);
}

#[tokio::test]
async fn test_process_claims_when_empty_then_no_network_calls() {
    let harness = HarnessBuilder::default().build();

    let results = harness.engine.process_claims(Vec::new()).await.expect("empty");

    assert!(results.is_empty());
    assert_eq!(harness.node.rpc_calls(), 0);
}

#[tokio::test]
async fn test_process_claims_when_mixed_authorization_then_only_own_identities_claimed() {
    let harness = HarnessBuilder::default().build();
    harness.node.delegate(test_pubkey(1), STATUS_ACTIVE, test_signer_address(), INTENT_FEE_RECIPIENT);
    harness.node.delegate(test_pubkey(2), STATUS_ACTIVE, OTHER_REPRESENTATIVE, INTENT_FEE_RECIPIENT);

    let results = harness.engine.process_claims(vec![report(1, 32), report(2, 32), report(3, 32)]).await.expect("claims");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].pubkey, test_pubkey(1));
    assert_eq!(results[0].action, DelegationAction::Claim);
    let sent = harness.node.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(results[0].outcome, TransactionOutcome::Confirmed { tx_hash: sent[0].hash });

    let call = INativeDelegationLedger::claimNativeDelegationCall::abi_decode(&sent[0].input).expect("claim calldata");
    assert_eq!(&call.blsPublicKey[..], &test_pubkey(1).as_bytes()[..]);
    assert_eq!(call.reportedBalance, U256::from(32u64));
    assert_eq!(call.signature.v, 28);

    assert_eq!(harness.observer.omission_reason(&test_pubkey(2)).as_deref(), Some("unauthorized"));
    assert_eq!(harness.observer.omission_reason(&test_pubkey(3)).as_deref(), Some("not_delegated"));
    assert_eq!(harness.observer.actions().len(), 1);
}

#[tokio::test]
async fn test_process_exits_when_ledger_reverts_then_failed_outcome() {
    let harness = HarnessBuilder::default().build();
    harness.node.delegate(test_pubkey(5), STATUS_ACTIVE, test_signer_address(), INTENT_FEE_RECIPIENT);
    harness.node.revert_calls_to(LEDGER_ADDRESS);

    let results = harness.engine.process_exits(vec![report(5, 31)]).await.expect("exits");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].action, DelegationAction::Exit);
    assert!(matches!(results[0].outcome, TransactionOutcome::Failed { tx_hash: Some(_), .. }));
    let sent = harness.node.sent();
    assert!(INativeDelegationLedger::exitNativeDelegationCall::abi_decode(&sent[0].input).is_ok());
}

#[tokio::test]
async fn test_process_exits_when_each_identity_then_one_transaction_per_identity() {
    let harness = HarnessBuilder::default().build();
    for index in 0..3 {
        harness.node.delegate(test_pubkey(index), STATUS_ACTIVE, test_signer_address(), INTENT_FEE_RECIPIENT);
    }

    let results = harness.engine.process_exits((0..3).map(|index| report(index, 1)).collect()).await.expect("exits");

    assert_eq!(results.len(), 3);
    let nonces: Vec<u64> = harness.node.sent().iter().map(|tx| tx.nonce).collect();
    assert_eq!(nonces, vec![0, 1, 2]);
}
