pub mod chunking;
pub mod classification;
pub mod exclusion;
pub mod outcome;
pub mod registration;
pub mod report;
pub mod status;
pub mod transaction;

pub use chunking::{chunk_ranges, dedup_by_identity, RangeSplitter};
pub use classification::{classify, IdentityState};
pub use exclusion::{ExclusionEntry, ExclusionRecord, ExclusionTable};
pub use outcome::{DispatchStatus, ReconciliationResult};
pub use registration::{PayoutSource, PreparedRegistration, RegistrationMessage, SignedRegistration};
pub use report::{DelegationAction, DelegationActionResult, DelegationReport, TransactionOutcome};
pub use status::{Authority, AuthorityStatus, IdentityStatus, StatusKind, StatusMap, StatusSnapshot};
pub use transaction::{validate_transition, TxLifecycle, TxPhase};
