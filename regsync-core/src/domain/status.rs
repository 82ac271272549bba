use crate::foundation::{
    BlsPublicKey, REGISTRY_STATUS_ACTIVE, REGISTRY_STATUS_EXITED, REGISTRY_STATUS_EXIT_PENDING, REGISTRY_STATUS_KICKED,
    REGISTRY_STATUS_REGISTERED, REGISTRY_STATUS_UNREGISTERED,
};
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Authority {
    Registry,
    DelegationLedger,
}

impl fmt::Display for Authority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry => write!(f, "registry"),
            Self::DelegationLedger => write!(f, "delegation_ledger"),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Unregistered,
    Registered,
    Active,
    ExitPending,
    Exited,
    Kicked,
    Other(u8),
}

impl StatusKind {
    pub fn from_registry_code(code: u8) -> Self {
        match code {
            REGISTRY_STATUS_UNREGISTERED => Self::Unregistered,
            REGISTRY_STATUS_REGISTERED => Self::Registered,
            REGISTRY_STATUS_ACTIVE => Self::Active,
            REGISTRY_STATUS_EXIT_PENDING => Self::ExitPending,
            REGISTRY_STATUS_EXITED => Self::Exited,
            REGISTRY_STATUS_KICKED => Self::Kicked,
            other => Self::Other(other),
        }
    }

    /// The ledger keys registration off the representative: a zero operator means "not delegated"
    /// whatever the status byte says.
    pub fn from_ledger_fields(representative: Address, code: u8) -> Self {
        if representative.is_zero() {
            return Self::Unregistered;
        }
        match Self::from_registry_code(code) {
            Self::Unregistered => Self::Registered,
            other => other,
        }
    }

    pub fn is_unregistered(&self) -> bool {
        matches!(self, Self::Unregistered)
    }
}

/// Status of one identity at one authority, read fresh for every reconciliation call.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct AuthorityStatus {
    pub status: StatusKind,
    pub representative: Address,
    pub payout_recipient: Address,
}

impl AuthorityStatus {
    pub const UNREGISTERED: Self =
        Self { status: StatusKind::Unregistered, representative: Address::ZERO, payout_recipient: Address::ZERO };

    pub fn is_unregistered(&self) -> bool {
        self.status.is_unregistered()
    }
}

impl Default for AuthorityStatus {
    fn default() -> Self {
        Self::UNREGISTERED
    }
}

/// Per-identity view across both authorities. `delegation` is `None` when the ledger is not configured.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IdentityStatus {
    pub registry: AuthorityStatus,
    pub delegation: Option<AuthorityStatus>,
}

pub type StatusMap = HashMap<BlsPublicKey, AuthorityStatus>;

/// One consistent read of both authorities for the identities of a chunk.
#[derive(Clone, Debug, Default)]
pub struct StatusSnapshot {
    pub registry: StatusMap,
    pub delegation: Option<StatusMap>,
}

impl StatusSnapshot {
    /// Missing entries read as unregistered; the status reader guarantees one entry per requested identity.
    pub fn identity(&self, pubkey: &BlsPublicKey) -> IdentityStatus {
        IdentityStatus {
            registry: self.registry.get(pubkey).copied().unwrap_or_default(),
            delegation: self.delegation.as_ref().map(|map| map.get(pubkey).copied().unwrap_or_default()),
        }
    }
}
