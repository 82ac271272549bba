use crate::foundation::{RegsyncError, Result};
use crate::infrastructure::chain::ChainGateway;
use crate::infrastructure::contracts::IMulticall3;
use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;

pub fn allow_failure_call(target: Address, call_data: impl Into<Bytes>) -> IMulticall3::Call3 {
    IMulticall3::Call3 { target, allowFailure: true, callData: call_data.into() }
}

impl ChainGateway {
    /// One `aggregate3` read. The returned vector lines up index-for-index with `calls`.
    pub async fn aggregate3(&self, calls: Vec<IMulticall3::Call3>) -> Result<Vec<IMulticall3::Result>> {
        let expected = calls.len();
        let data = IMulticall3::aggregate3Call { calls }.abi_encode();
        let raw = self.read(self.settings().multicall_address, data.into()).await?;
        let results = IMulticall3::aggregate3Call::abi_decode_returns(&raw).map_err(|err| RegsyncError::abi("aggregate3 decode", err))?;
        if results.len() != expected {
            return Err(RegsyncError::abi("aggregate3 decode", format!("expected {expected} results, got {}", results.len())));
        }
        Ok(results)
    }
}
