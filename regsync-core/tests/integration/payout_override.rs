use crate::fixtures::*;
use regsync_core::foundation::BlsSignature;

const ORIGINAL_SIGNATURE: BlsSignature = BlsSignature::new([0x11; 96]);

#[tokio::test]
async fn test_payout_override_when_no_remote_signer_then_recipient_substituted() {
    let harness = HarnessBuilder::default().without_delegation().payout_override(OVERRIDE_RECIPIENT).build();

    let results = harness.engine.process_registrations(registrations([1])).await.expect("process");

    let batch = harness.node.sent()[0].registry_batch().expect("registry calldata");
    assert_eq!(batch.payoutRecipients, vec![OVERRIDE_RECIPIENT]);
    assert_eq!(&batch.blsSignatures[0][..], &ORIGINAL_SIGNATURE.as_bytes()[..]);
    assert_eq!(results[0].payout_recipient, OVERRIDE_RECIPIENT);
}

#[tokio::test]
async fn test_payout_override_when_key_signable_then_resigned() {
    let harness = HarnessBuilder::default()
        .without_delegation()
        .payout_override(OVERRIDE_RECIPIENT)
        .remote_signer(MockRemoteSigner::holding([test_pubkey(1)]))
        .build();

    let results = harness.engine.process_registrations(registrations([1, 2])).await.expect("process");

    let remote = harness.remote_signer.as_ref().expect("remote signer");
    assert_eq!(remote.list_calls(), 1);
    let signed = remote.signed();
    assert_eq!(signed.len(), 1);
    assert_eq!(signed[0].pubkey, test_pubkey(1));
    assert_eq!(signed[0].fee_recipient, OVERRIDE_RECIPIENT);

    let batch = harness.node.sent()[0].registry_batch().expect("registry calldata");
    assert_eq!(batch.payoutRecipients, vec![OVERRIDE_RECIPIENT, INTENT_FEE_RECIPIENT]);
    assert_eq!(&batch.blsSignatures[0][..], &RESIGNED_SIGNATURE.as_bytes()[..]);
    assert_eq!(&batch.blsSignatures[1][..], &ORIGINAL_SIGNATURE.as_bytes()[..]);
    assert_eq!(results[0].payout_recipient, OVERRIDE_RECIPIENT);
    assert_eq!(results[1].payout_recipient, INTENT_FEE_RECIPIENT);
}

#[tokio::test]
async fn test_payout_override_when_key_listing_fails_then_original_recipients_kept() {
    let harness = HarnessBuilder::default()
        .without_delegation()
        .payout_override(OVERRIDE_RECIPIENT)
        .remote_signer(MockRemoteSigner::unreachable())
        .build();

    let results = harness.engine.process_registrations(registrations([1, 2])).await.expect("process");

    assert_eq!(results.len(), 2);
    let batch = harness.node.sent()[0].registry_batch().expect("registry calldata");
    assert_eq!(batch.payoutRecipients, vec![INTENT_FEE_RECIPIENT, INTENT_FEE_RECIPIENT]);
    assert_eq!(harness.remote_signer.as_ref().expect("remote signer").list_calls(), 1);
}

#[tokio::test]
async fn test_payout_override_when_resign_fails_then_identity_omitted() {
    let remote = MockRemoteSigner::holding([test_pubkey(1), test_pubkey(2)]);
    remote.fail_signing(test_pubkey(1));
    let harness =
        HarnessBuilder::default().without_delegation().payout_override(OVERRIDE_RECIPIENT).remote_signer(remote).build();

    let results = harness.engine.process_registrations(registrations([1, 2])).await.expect("process");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].pubkey, test_pubkey(2));
    assert_eq!(harness.node.sent()[0].registry_pubkeys(), vec![test_pubkey(2)]);
    assert_eq!(harness.observer.omission_reason(&test_pubkey(1)).as_deref(), Some("resign"));
}

#[tokio::test]
async fn test_payout_override_when_signer_answers_for_other_key_then_identity_omitted() {
    let remote = MockRemoteSigner::holding([test_pubkey(1), test_pubkey(2)]);
    remote.answer_with_other_key(test_pubkey(1), test_pubkey(9));
    let harness =
        HarnessBuilder::default().without_delegation().payout_override(OVERRIDE_RECIPIENT).remote_signer(remote).build();

    let results = harness.engine.process_registrations(registrations([1, 2])).await.expect("process");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].pubkey, test_pubkey(2));
    assert_eq!(harness.node.sent()[0].registry_pubkeys(), vec![test_pubkey(2)]);
    assert_eq!(harness.observer.omission_reason(&test_pubkey(1)).as_deref(), Some("resign"));
}

#[tokio::test]
async fn test_payout_override_when_already_registered_then_untouched() {
    let harness = HarnessBuilder::default()
        .payout_override(OVERRIDE_RECIPIENT)
        .remote_signer(MockRemoteSigner::holding([test_pubkey(1)]))
        .build();
    harness.node.register(test_pubkey(1), STATUS_ACTIVE, test_signer_address(), INTENT_FEE_RECIPIENT);

    let results = harness.engine.process_registrations(registrations([1])).await.expect("process");

    let remote = harness.remote_signer.as_ref().expect("remote signer");
    assert_eq!(remote.list_calls(), 0);
    assert!(remote.signed().is_empty());
    assert_eq!(results[0].payout_recipient, INTENT_FEE_RECIPIENT);
    let delegation = harness.node.sent()[0].delegation_batch().expect("delegation calldata");
    assert_eq!(delegation.payoutRecipients, vec![INTENT_FEE_RECIPIENT]);
}

#[tokio::test]
async fn test_payout_override_when_intent_already_matches_then_no_resign() {
    let harness = HarnessBuilder::default()
        .without_delegation()
        .payout_override(OVERRIDE_RECIPIENT)
        .remote_signer(MockRemoteSigner::holding([test_pubkey(1)]))
        .build();
    let intent = RegistrationBuilder::new(1).fee_recipient(OVERRIDE_RECIPIENT).build();

    harness.engine.process_registrations(vec![intent]).await.expect("process");

    assert_eq!(harness.remote_signer.as_ref().expect("remote signer").list_calls(), 0);
    let batch = harness.node.sent()[0].registry_batch().expect("registry calldata");
    assert_eq!(&batch.blsSignatures[0][..], &ORIGINAL_SIGNATURE.as_bytes()[..]);
}
