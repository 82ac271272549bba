use crate::fixtures::*;
use alloy::primitives::Address;
use regsync_core::domain::{Authority, AuthorityStatus, StatusKind};
use regsync_core::infrastructure::status::{MulticallStatusReader, StatusSource};
use regsync_core::RegsyncError;

fn reader(harness: &TestHarness, delegation: Option<Address>, chunk_size: usize) -> MulticallStatusReader {
    MulticallStatusReader::new(harness.gateway.clone(), REGISTRY_ADDRESS, delegation, chunk_size)
}

fn keys(count: u32) -> Vec<regsync_core::foundation::BlsPublicKey> {
    (0..count).map(test_pubkey).collect()
}

#[tokio::test]
async fn test_batch_get_status_when_empty_then_no_call() {
    let harness = HarnessBuilder::default().build();

    let statuses = reader(&harness, Some(LEDGER_ADDRESS), 10).batch_get_status(&[], Authority::Registry).await.expect("read");

    assert!(statuses.is_empty());
    assert_eq!(harness.node.rpc_calls(), 0);
}

#[tokio::test]
async fn test_batch_get_status_when_one_entry_fails_then_entry_unregistered() {
    let harness = HarnessBuilder::default().build();
    let pubkeys = keys(5);
    for pubkey in &pubkeys {
        harness.node.register(*pubkey, STATUS_ACTIVE, OTHER_REPRESENTATIVE, INTENT_FEE_RECIPIENT);
    }
    harness.node.fail_lookup(pubkeys[3]);

    let statuses = reader(&harness, None, 500).batch_get_status(&pubkeys, Authority::Registry).await.expect("read");

    assert_eq!(statuses.len(), 5);
    assert_eq!(statuses[&pubkeys[3]], AuthorityStatus::UNREGISTERED);
    assert_eq!(statuses[&pubkeys[0]].status, StatusKind::Active);
    assert_eq!(statuses[&pubkeys[0]].representative, OTHER_REPRESENTATIVE);
}

#[tokio::test]
async fn test_batch_get_status_when_chunk_smaller_than_input_then_sequential_reads() {
    let harness = HarnessBuilder::default().build();

    let statuses = reader(&harness, None, 2).batch_get_status(&keys(5), Authority::Registry).await.expect("read");

    assert_eq!(statuses.len(), 5);
    assert_eq!(harness.node.aggregate_sizes(), vec![2, 2, 1]);
}

#[tokio::test]
async fn test_batch_get_status_when_response_too_large_then_halves_until_served() {
    let harness = HarnessBuilder::default().build();
    harness.node.limit_aggregate_calls(2);

    let statuses = reader(&harness, None, 500).batch_get_status(&keys(5), Authority::Registry).await.expect("read");

    assert_eq!(statuses.len(), 5);
    assert_eq!(harness.node.aggregate_sizes(), vec![5, 2, 3, 1, 2]);
}

#[tokio::test]
async fn test_batch_get_status_when_node_unreachable_then_status_read_failed() {
    let harness = HarnessBuilder::default().build();
    harness.node.fail_aggregate_reads("connection refused");

    let err = reader(&harness, None, 500).batch_get_status(&keys(2), Authority::Registry).await.expect_err("read fails");

    assert!(matches!(err, RegsyncError::StatusReadFailed { ref authority, .. } if authority == "registry"));
}

#[tokio::test]
async fn test_batch_get_status_when_ledger_not_configured_then_missing_address() {
    let harness = HarnessBuilder::default().build();

    let err = reader(&harness, None, 500).batch_get_status(&keys(1), Authority::DelegationLedger).await.expect_err("no ledger");

    assert!(matches!(err, RegsyncError::MissingContractAddress(_)));
}

#[tokio::test]
async fn test_batch_get_status_when_ledger_representative_zero_then_unregistered() {
    let harness = HarnessBuilder::default().build();
    let pubkeys = keys(2);
    harness.node.delegate(pubkeys[0], STATUS_ACTIVE, Address::ZERO, INTENT_FEE_RECIPIENT);
    harness.node.delegate(pubkeys[1], 0, test_signer_address(), INTENT_FEE_RECIPIENT);

    let statuses =
        reader(&harness, Some(LEDGER_ADDRESS), 500).batch_get_status(&pubkeys, Authority::DelegationLedger).await.expect("read");

    assert!(statuses[&pubkeys[0]].is_unregistered());
    assert_eq!(statuses[&pubkeys[1]].status, StatusKind::Registered);
}
