//! System-wide constants for registration reconciliation.

/// Maximum number of identities reconciled and dispatched in one transaction.
///
/// Larger request batches are split into sequential chunks of this size.
pub const MAX_IDENTITIES_PER_TRANSACTION: usize = 1000;

/// Default number of identities per multicall status read.
pub const DEFAULT_STATUS_CHUNK_SIZE: usize = 500;

/// Receipt polling interval in milliseconds (1 second).
pub const RECEIPT_POLL_INTERVAL_MS: u64 = 1_000;

/// Default time to wait for a receipt before reporting an ambiguous outcome (2 minutes).
pub const DEFAULT_CONFIRMATION_TIMEOUT_SECS: u64 = 120;

/// Canonical Multicall3 deployment address (same on every EVM chain it is deployed to).
pub const MULTICALL3_ADDRESS: &str = "0xcA11bde05977b3631167028862bE2a173976CA11";

/// Default exclusion-list poll interval in seconds.
pub const DEFAULT_EXCLUSION_POLL_SECS: u64 = 10;

/// Gas estimate headroom in percent added on top of `eth_estimateGas`.
pub const GAS_LIMIT_HEADROOM_PERCENT: u64 = 20;

/// Registry status codes as stored on chain.
pub const REGISTRY_STATUS_UNREGISTERED: u8 = 0;
pub const REGISTRY_STATUS_REGISTERED: u8 = 1;
pub const REGISTRY_STATUS_ACTIVE: u8 = 2;
pub const REGISTRY_STATUS_EXIT_PENDING: u8 = 3;
pub const REGISTRY_STATUS_EXITED: u8 = 4;
pub const REGISTRY_STATUS_KICKED: u8 = 5;
