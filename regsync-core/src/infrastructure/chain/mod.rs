mod gateway;
mod multicall;

pub use gateway::{ChainGateway, GatewaySettings, SignedTx, TxAttempt};
pub use multicall::allow_failure_call;
