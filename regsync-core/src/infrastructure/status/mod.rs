//! Authority status reads through Multicall3 with per-entry failure tolerance.

use crate::domain::{Authority, AuthorityStatus, RangeSplitter, StatusKind, StatusMap};
use crate::foundation::{BlsPublicKey, RegsyncError, Result};
use crate::infrastructure::chain::{allow_failure_call, ChainGateway};
use crate::infrastructure::contracts::{INativeDelegationLedger, IProposerRegistry};
use crate::infrastructure::rpc::is_size_limit_error;
use alloy::primitives::{Address, Bytes};
use alloy::sol_types::SolCall;
use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Exactly one entry per distinct input identity. Lookups that failed individually read as
    /// unregistered; only a failure of the whole read is an error. Empty input makes no call.
    async fn batch_get_status(&self, identities: &[BlsPublicKey], authority: Authority) -> Result<StatusMap>;
}

pub struct MulticallStatusReader {
    gateway: Arc<ChainGateway>,
    registry: Address,
    delegation: Option<Address>,
    chunk_size: usize,
}

impl MulticallStatusReader {
    pub fn new(gateway: Arc<ChainGateway>, registry: Address, delegation: Option<Address>, chunk_size: usize) -> Self {
        Self { gateway, registry, delegation, chunk_size: chunk_size.max(1) }
    }

    fn authority_address(&self, authority: Authority) -> Result<Address> {
        match authority {
            Authority::Registry => Ok(self.registry),
            Authority::DelegationLedger => {
                self.delegation.ok_or_else(|| RegsyncError::MissingContractAddress("delegation.address".to_string()))
            }
        }
    }
}

pub fn encode_status_lookup(authority: Authority, pubkey: &BlsPublicKey) -> Bytes {
    match authority {
        Authority::Registry => IProposerRegistry::getProposerCall { blsPublicKey: pubkey.to_bytes() }.abi_encode().into(),
        Authority::DelegationLedger => {
            INativeDelegationLedger::getNativeDelegationCall { blsPublicKey: pubkey.to_bytes() }.abi_encode().into()
        }
    }
}

pub fn decode_status_lookup(authority: Authority, data: &[u8]) -> Result<AuthorityStatus> {
    match authority {
        Authority::Registry => {
            let info = IProposerRegistry::getProposerCall::abi_decode_returns(data)
                .map_err(|err| RegsyncError::abi("getProposer decode", err))?;
            Ok(AuthorityStatus {
                status: StatusKind::from_registry_code(info.status),
                representative: info.representative,
                payout_recipient: info.payoutRecipient,
            })
        }
        Authority::DelegationLedger => {
            let info = INativeDelegationLedger::getNativeDelegationCall::abi_decode_returns(data)
                .map_err(|err| RegsyncError::abi("getNativeDelegation decode", err))?;
            Ok(AuthorityStatus {
                status: StatusKind::from_ledger_fields(info.representative, info.status),
                representative: info.representative,
                payout_recipient: info.payoutRecipient,
            })
        }
    }
}

#[async_trait]
impl StatusSource for MulticallStatusReader {
    async fn batch_get_status(&self, identities: &[BlsPublicKey], authority: Authority) -> Result<StatusMap> {
        let mut statuses = StatusMap::with_capacity(identities.len());
        if identities.is_empty() {
            return Ok(statuses);
        }
        let target = self.authority_address(authority)?;
        let mut work = RangeSplitter::new(identities.len(), self.chunk_size);

        while let Some(range) = work.next_range() {
            let keys = &identities[range.clone()];
            let calls = keys.iter().map(|pubkey| allow_failure_call(target, encode_status_lookup(authority, pubkey))).collect();
            let results = match self.gateway.aggregate3(calls).await {
                Ok(results) => results,
                Err(err) => {
                    if is_size_limit_error(&err) && work.split(range.clone()) {
                        warn!("status read hit a size limit; splitting authority={} size={} error={}", authority, range.len(), err);
                        continue;
                    }
                    return Err(RegsyncError::StatusReadFailed { authority: authority.to_string(), details: err.to_string() });
                }
            };

            for (pubkey, result) in keys.iter().zip(results) {
                let status = if result.success {
                    decode_status_lookup(authority, &result.returnData).unwrap_or_else(|err| {
                        warn!("status entry undecodable; treating as unregistered authority={} pubkey={} error={}", authority, pubkey, err);
                        AuthorityStatus::UNREGISTERED
                    })
                } else {
                    debug!("status lookup reverted; treating as unregistered authority={} pubkey={}", authority, pubkey);
                    AuthorityStatus::UNREGISTERED
                };
                statuses.insert(*pubkey, status);
            }
        }

        debug!("status read complete authority={} identities={}", authority, statuses.len());
        Ok(statuses)
    }
}
