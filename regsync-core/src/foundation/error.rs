use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    ConfigError,
    ChainIdMismatch,
    MissingContractAddress,
    StatusReadFailed,
    AbiError,
    GasPriceTooHigh,
    SigningFailed,
    SendFailed,
    TransactionReverted,
    ConfirmationCancelled,
    NodeRpcError,
    RemoteSignerError,
    SecondarySignatureFailed,
    NotAuthorized,
    ExclusionListError,
    InvalidPublicKey,
    InvalidStateTransition,
    EncodingError,
    SerializationError,
    IoError,
    NetworkError,
    Message,
}

/// Coarse error taxonomy used to decide how far a failure propagates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Fatal at startup; the engine must not accept requests.
    Configuration,
    /// Aborts the whole call; no partial results.
    BatchFatal,
    /// Drops a single identity from the call.
    PerIdentity,
    /// Fails the identities of one authority transaction only.
    Transaction,
    /// The transaction may or may not have landed; callers must re-read state.
    Ambiguous,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum RegsyncError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("chain id mismatch for {component}: expected {expected}, got {actual}")]
    ChainIdMismatch { component: String, expected: u64, actual: u64 },

    #[error("missing contract address: {0}")]
    MissingContractAddress(String),

    #[error("status read failed for {authority}: {details}")]
    StatusReadFailed { authority: String, details: String },

    #[error("abi error during {operation}: {details}")]
    AbiError { operation: String, details: String },

    #[error("suggested gas price {suggested_wei} wei exceeds ceiling {max_wei} wei")]
    GasPriceTooHigh { suggested_wei: u128, max_wei: u128 },

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("transaction send failed tx_hash={tx_hash}: {details}")]
    SendFailed { tx_hash: String, details: String },

    #[error("transaction reverted tx_hash={tx_hash} block_number={block_number:?}")]
    TransactionReverted { tx_hash: String, block_number: Option<u64> },

    #[error("confirmation wait cancelled tx_hash={tx_hash}: {reason}")]
    ConfirmationCancelled { tx_hash: String, reason: String },

    #[error("node RPC error during {operation}: {details}")]
    NodeRpcError { operation: String, details: String },

    #[error("remote signer error during {operation}: {details}")]
    RemoteSignerError { operation: String, details: String },

    #[error("secondary signature failed for pubkey={pubkey}: {details}")]
    SecondarySignatureFailed { pubkey: String, details: String },

    #[error("not authorized: pubkey={pubkey} representative={representative} signer={signer}")]
    NotAuthorized { pubkey: String, representative: String, signer: String },

    #[error("exclusion list error path={path}: {details}")]
    ExclusionListError { path: String, details: String },

    #[error("invalid public key: input={input} reason={reason}")]
    InvalidPublicKey { input: String, reason: String },

    #[error("invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("{format} serialization error: {details}")]
    SerializationError { format: String, details: String },

    #[error("io error during {operation}: {details}")]
    IoError { operation: String, details: String },

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, RegsyncError>;

impl RegsyncError {
    pub fn code(&self) -> ErrorCode {
        match self {
            RegsyncError::ConfigError(_) => ErrorCode::ConfigError,
            RegsyncError::ChainIdMismatch { .. } => ErrorCode::ChainIdMismatch,
            RegsyncError::MissingContractAddress(_) => ErrorCode::MissingContractAddress,
            RegsyncError::StatusReadFailed { .. } => ErrorCode::StatusReadFailed,
            RegsyncError::AbiError { .. } => ErrorCode::AbiError,
            RegsyncError::GasPriceTooHigh { .. } => ErrorCode::GasPriceTooHigh,
            RegsyncError::SigningFailed(_) => ErrorCode::SigningFailed,
            RegsyncError::SendFailed { .. } => ErrorCode::SendFailed,
            RegsyncError::TransactionReverted { .. } => ErrorCode::TransactionReverted,
            RegsyncError::ConfirmationCancelled { .. } => ErrorCode::ConfirmationCancelled,
            RegsyncError::NodeRpcError { .. } => ErrorCode::NodeRpcError,
            RegsyncError::RemoteSignerError { .. } => ErrorCode::RemoteSignerError,
            RegsyncError::SecondarySignatureFailed { .. } => ErrorCode::SecondarySignatureFailed,
            RegsyncError::NotAuthorized { .. } => ErrorCode::NotAuthorized,
            RegsyncError::ExclusionListError { .. } => ErrorCode::ExclusionListError,
            RegsyncError::InvalidPublicKey { .. } => ErrorCode::InvalidPublicKey,
            RegsyncError::InvalidStateTransition { .. } => ErrorCode::InvalidStateTransition,
            RegsyncError::EncodingError(_) => ErrorCode::EncodingError,
            RegsyncError::SerializationError { .. } => ErrorCode::SerializationError,
            RegsyncError::IoError { .. } => ErrorCode::IoError,
            RegsyncError::NetworkError(_) => ErrorCode::NetworkError,
            RegsyncError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn class(&self) -> ErrorClass {
        match self {
            RegsyncError::ConfigError(_) | RegsyncError::ChainIdMismatch { .. } | RegsyncError::MissingContractAddress(_) => {
                ErrorClass::Configuration
            }
            RegsyncError::RemoteSignerError { .. }
            | RegsyncError::SecondarySignatureFailed { .. }
            | RegsyncError::NotAuthorized { .. }
            | RegsyncError::InvalidPublicKey { .. } => ErrorClass::PerIdentity,
            RegsyncError::GasPriceTooHigh { .. }
            | RegsyncError::SigningFailed(_)
            | RegsyncError::SendFailed { .. }
            | RegsyncError::TransactionReverted { .. } => ErrorClass::Transaction,
            RegsyncError::ConfirmationCancelled { .. } => ErrorClass::Ambiguous,
            _ => ErrorClass::BatchFatal,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        self.class() == ErrorClass::Ambiguous
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    pub fn node_rpc(operation: impl Into<String>, details: impl ToString) -> Self {
        RegsyncError::NodeRpcError { operation: operation.into(), details: details.to_string() }
    }

    pub fn abi(operation: impl Into<String>, details: impl ToString) -> Self {
        RegsyncError::AbiError { operation: operation.into(), details: details.to_string() }
    }

    pub fn not_authorized(pubkey: impl ToString, representative: impl ToString, signer: impl ToString) -> Self {
        Self::NotAuthorized { pubkey: pubkey.to_string(), representative: representative.to_string(), signer: signer.to_string() }
    }

    pub fn remote_signer(operation: impl Into<String>, details: impl ToString) -> Self {
        RegsyncError::RemoteSignerError { operation: operation.into(), details: details.to_string() }
    }
}

impl From<hex::FromHexError> for RegsyncError {
    fn from(err: hex::FromHexError) -> Self {
        RegsyncError::EncodingError(format!("hex decode error: {}", err))
    }
}

impl From<toml::de::Error> for RegsyncError {
    fn from(err: toml::de::Error) -> Self {
        RegsyncError::ConfigError(format!("TOML parsing error: {}", err))
    }
}

impl From<io::Error> for RegsyncError {
    fn from(err: io::Error) -> Self {
        RegsyncError::IoError { operation: "io".to_string(), details: err.to_string() }
    }
}

impl From<serde_json::Error> for RegsyncError {
    fn from(err: serde_json::Error) -> Self {
        RegsyncError::SerializationError { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<reqwest::Error> for RegsyncError {
    fn from(err: reqwest::Error) -> Self {
        RegsyncError::NetworkError(err.to_string())
    }
}

impl From<alloy::sol_types::Error> for RegsyncError {
    fn from(err: alloy::sol_types::Error) -> Self {
        RegsyncError::AbiError { operation: "sol_types".to_string(), details: err.to_string() }
    }
}

impl From<alloy::signers::Error> for RegsyncError {
    fn from(err: alloy::signers::Error) -> Self {
        RegsyncError::SigningFailed(err.to_string())
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `RegsyncError` variants at the call site to preserve context.
