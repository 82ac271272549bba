use alloy::primitives::{address, Address};
use proptest::prelude::*;
use regsync_core::domain::{classify, AuthorityStatus, ExclusionEntry, IdentityState, IdentityStatus, StatusKind};

const SIGNER: Address = address!("0101010101010101010101010101010101010101");
const OTHER: Address = address!("0202020202020202020202020202020202020202");
const PAYOUT: Address = address!("0303030303030303030303030303030303030303");

fn authority_status() -> impl Strategy<Value = AuthorityStatus> {
    (0u8..6, prop_oneof![Just(SIGNER), Just(OTHER)], any::<bool>()).prop_map(|(code, representative, registered)| {
        if !registered || code == 0 {
            AuthorityStatus::UNREGISTERED
        } else {
            AuthorityStatus { status: StatusKind::from_registry_code(code), representative, payout_recipient: PAYOUT }
        }
    })
}

fn identity_status() -> impl Strategy<Value = IdentityStatus> {
    (authority_status(), proptest::option::of(authority_status()))
        .prop_map(|(registry, delegation)| IdentityStatus { registry, delegation })
}

fn exclusion() -> impl Strategy<Value = ExclusionEntry> {
    (any::<bool>(), any::<bool>())
        .prop_map(|(exclude_registry, exclude_native_delegation)| ExclusionEntry { exclude_registry, exclude_native_delegation })
}

proptest! {
    #[test]
    fn test_registry_exclusion_never_yields_registry_registration(status in identity_status(), entry in exclusion()) {
        let entry = ExclusionEntry { exclude_registry: true, ..entry };
        prop_assert!(!classify(&status, &entry, SIGNER).needs_registry_registration());
    }

    #[test]
    fn test_delegation_exclusion_never_yields_delegation(status in identity_status(), entry in exclusion()) {
        let entry = ExclusionEntry { exclude_native_delegation: true, ..entry };
        prop_assert!(!classify(&status, &entry, SIGNER).needs_delegation());
    }

    #[test]
    fn test_foreign_representative_never_delegated(status in identity_status(), entry in exclusion()) {
        let state = classify(&status, &entry, SIGNER);
        if !status.registry.is_unregistered() && status.registry.representative != SIGNER {
            prop_assert!(!state.needs_delegation());
        }
    }

    #[test]
    fn test_disabled_ledger_never_yields_delegation(status in identity_status(), entry in exclusion()) {
        let status = IdentityStatus { delegation: None, ..status };
        let state = classify(&status, &entry, SIGNER);
        prop_assert!(!state.needs_delegation());
        prop_assert!(state != IdentityState::Inconsistent);
    }

    #[test]
    fn test_registered_identities_need_no_registry_transaction(status in identity_status(), entry in exclusion()) {
        if !status.registry.is_unregistered() {
            prop_assert!(!classify(&status, &entry, SIGNER).needs_registry_registration());
        }
    }
}
