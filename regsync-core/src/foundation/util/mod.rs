pub mod encoding;
pub mod serde_quoted;
