//! Pure per-identity classification.
//!
//! Given one identity's status at both authorities, its exclusion flags, and the engine's own
//! signing address, decide which lifecycle state the identity is in and therefore which
//! transactions (if any) it needs. No I/O happens here.

use crate::domain::exclusion::ExclusionEntry;
use crate::domain::status::IdentityStatus;
use alloy::primitives::Address;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IdentityState {
    /// Unregistered at the registry and excluded from registry registration. No action, no result.
    Excluded,
    /// Unregistered at the registry: needs a registry registration, and a delegation too when `delegate`.
    Unregistered { delegate: bool },
    /// Registered at the registry. `delegate` marks a delegation candidate.
    RegistryOnly { representative: Address, payout_recipient: Address, delegate: bool },
    /// Present at both authorities; nothing to do.
    FullyDelegated { representative: Address, payout_recipient: Address },
    /// Registered under a representative other than the engine's signing address.
    Unauthorized { representative: Address },
    /// Delegated at the ledger while unregistered at the registry; the ledger must refine the registry.
    Inconsistent,
}

impl IdentityState {
    pub fn needs_registry_registration(&self) -> bool {
        matches!(self, Self::Unregistered { .. })
    }

    pub fn needs_delegation(&self) -> bool {
        matches!(self, Self::Unregistered { delegate: true } | Self::RegistryOnly { delegate: true, .. })
    }

    /// Whether the identity appears in the caller-visible results.
    pub fn is_reported(&self) -> bool {
        !matches!(self, Self::Excluded | Self::Unauthorized { .. } | Self::Inconsistent)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Excluded => "excluded",
            Self::Unregistered { .. } => "unregistered",
            Self::RegistryOnly { .. } => "registry_only",
            Self::FullyDelegated { .. } => "fully_delegated",
            Self::Unauthorized { .. } => "unauthorized",
            Self::Inconsistent => "inconsistent",
        }
    }
}

pub fn classify(status: &IdentityStatus, exclusion: &ExclusionEntry, signing_address: Address) -> IdentityState {
    let registry = &status.registry;
    let ledger_registered = status.delegation.map(|ledger| !ledger.is_unregistered()).unwrap_or(false);

    if registry.is_unregistered() {
        if ledger_registered {
            return IdentityState::Inconsistent;
        }
        if exclusion.exclude_registry {
            return IdentityState::Excluded;
        }
        // A fresh registration is made by the engine itself, so the engine is its representative.
        let delegate = status.delegation.is_some() && !exclusion.exclude_native_delegation;
        return IdentityState::Unregistered { delegate };
    }

    let representative = registry.representative;
    let payout_recipient = registry.payout_recipient;

    let Some(ledger) = status.delegation else {
        return IdentityState::RegistryOnly { representative, payout_recipient, delegate: false };
    };

    if !ledger.is_unregistered() {
        return IdentityState::FullyDelegated { representative, payout_recipient };
    }
    if exclusion.exclude_native_delegation {
        return IdentityState::RegistryOnly { representative, payout_recipient, delegate: false };
    }
    if representative != signing_address {
        return IdentityState::Unauthorized { representative };
    }
    IdentityState::RegistryOnly { representative, payout_recipient, delegate: true }
}
