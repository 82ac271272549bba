use crate::foundation::MAX_IDENTITIES_PER_TRANSACTION;
use crate::infrastructure::config::types::AppConfig;
use alloy::signers::local::PrivateKeySigner;
use std::str::FromStr;

impl AppConfig {
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if url::Url::parse(self.chain.rpc_url.trim()).is_err() {
            errors.push(format!("invalid chain.rpc_url: {}", self.chain.rpc_url));
        }
        if self.chain.chain_id == 0 {
            errors.push("chain.chain_id must be set".to_string());
        }
        if self.chain.max_gas_price_gwei == 0 {
            errors.push("chain.max_gas_price_gwei must be > 0".to_string());
        }
        if self.chain.receipt_poll_interval_ms == 0 {
            errors.push("chain.receipt_poll_interval_ms must be > 0".to_string());
        }
        if self.chain.confirmation_timeout_secs == 0 {
            errors.push("chain.confirmation_timeout_secs must be > 0".to_string());
        }
        if let Err(err) = self.chain.multicall_address() {
            errors.push(err.to_string());
        }

        if let Err(err) = self.registry.contract_address() {
            errors.push(err.to_string());
        }
        if self.registry.chain_id != self.chain.chain_id {
            errors.push(format!(
                "registry.chain_id ({}) does not match chain.chain_id ({})",
                self.registry.chain_id, self.chain.chain_id
            ));
        }
        if let Err(err) = self.registry.payout_override() {
            errors.push(err.to_string());
        }

        if self.delegation.enabled {
            if let Err(err) = self.delegation.contract_address() {
                errors.push(err.to_string());
            }
            if self.delegation.chain_id != self.chain.chain_id {
                errors.push(format!(
                    "delegation.chain_id ({}) does not match chain.chain_id ({})",
                    self.delegation.chain_id, self.chain.chain_id
                ));
            }
            if self.secondary_signer.url.as_deref().map(str::trim).unwrap_or_default().is_empty() {
                errors.push("secondary_signer.url is required when delegation.enabled=true".to_string());
            }
        }

        if self.signing.private_key.trim().is_empty() {
            errors.push("signing.private_key is required (REGSYNC_SIGNING__PRIVATE_KEY)".to_string());
        } else if PrivateKeySigner::from_str(self.signing.private_key.trim()).is_err() {
            errors.push("signing.private_key is not a valid secp256k1 key".to_string());
        }

        for (field, value) in [("remote_signer.url", &self.remote_signer.url), ("secondary_signer.url", &self.secondary_signer.url)] {
            if let Some(url) = value.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                if url::Url::parse(url).is_err() {
                    errors.push(format!("invalid {field}: {url}"));
                }
            }
        }

        if self.http.enabled && self.http.listen_addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!("invalid http.listen_addr: {}", self.http.listen_addr));
        }

        if self.runtime.max_batch_size == 0 || self.runtime.max_batch_size > MAX_IDENTITIES_PER_TRANSACTION {
            errors.push(format!("runtime.max_batch_size must be within 1..={MAX_IDENTITIES_PER_TRANSACTION}"));
        }
        if self.runtime.status_chunk_size == 0 {
            errors.push("runtime.status_chunk_size must be > 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
