//! Infrastructure layer: I/O and external integrations.

pub mod chain;
pub mod config;
pub mod contracts;
pub mod exclusions;
pub mod logging;
pub mod rpc;
pub mod signers;
pub mod status;
