use crate::foundation::{RegsyncError, Result};
use alloy::primitives::B256;
use log::{debug, info, warn};
use std::fmt;

/// Lifecycle of one outbound transaction.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TxPhase {
    Built,
    Signed,
    Submitted,
    Pending,
    Confirmed,
    Failed,
}

const VALID_TRANSITIONS: &[(TxPhase, TxPhase)] = &[
    (TxPhase::Built, TxPhase::Signed),
    (TxPhase::Built, TxPhase::Failed),
    (TxPhase::Signed, TxPhase::Submitted),
    (TxPhase::Signed, TxPhase::Failed),
    (TxPhase::Submitted, TxPhase::Pending),
    (TxPhase::Submitted, TxPhase::Failed),
    (TxPhase::Pending, TxPhase::Confirmed),
    (TxPhase::Pending, TxPhase::Failed),
];

impl TxPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Signed => "signed",
            Self::Submitted => "submitted",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for TxPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn validate_transition(from: TxPhase, to: TxPhase) -> bool {
    VALID_TRANSITIONS.contains(&(from, to))
}

/// Tracks a single transaction through its phases and logs every move.
#[derive(Clone, Debug)]
pub struct TxLifecycle {
    label: String,
    phase: TxPhase,
    tx_hash: Option<B256>,
}

impl TxLifecycle {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        debug!("transaction built label={}", label);
        Self { label, phase: TxPhase::Built, tx_hash: None }
    }

    pub fn phase(&self) -> TxPhase {
        self.phase
    }

    pub fn tx_hash(&self) -> Option<B256> {
        self.tx_hash
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn signed(&mut self, tx_hash: B256) -> Result<()> {
        self.tx_hash = Some(tx_hash);
        self.advance(TxPhase::Signed)
    }

    pub fn advance(&mut self, to: TxPhase) -> Result<()> {
        if !validate_transition(self.phase, to) {
            warn!(
                "rejected transaction phase transition label={} from={} to={} tx_hash={:?}",
                self.label, self.phase, to, self.tx_hash
            );
            return Err(RegsyncError::InvalidStateTransition { from: self.phase.to_string(), to: to.to_string() });
        }
        if to.is_terminal() {
            info!("transaction phase transition label={} from={} to={} tx_hash={:?}", self.label, self.phase, to, self.tx_hash);
        } else {
            debug!("transaction phase transition label={} from={} to={} tx_hash={:?}", self.label, self.phase, to, self.tx_hash);
        }
        self.phase = to;
        Ok(())
    }

    /// Move to `Failed` from any non-terminal phase.
    pub fn fail(&mut self, reason: &str) {
        if self.phase.is_terminal() {
            return;
        }
        warn!("transaction failed label={} phase={} tx_hash={:?} reason={}", self.label, self.phase, self.tx_hash, reason);
        self.phase = TxPhase::Failed;
    }
}
