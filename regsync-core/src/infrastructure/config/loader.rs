//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (`REGSYNC_*` prefix, `__` for nesting)

use crate::foundation::{RegsyncError, Result, DEFAULT_EXCLUSION_POLL_SECS, DEFAULT_STATUS_CHUNK_SIZE, MAX_IDENTITIES_PER_TRANSACTION};
use crate::infrastructure::config::types::{AppConfig, DEFAULT_HTTP_LISTEN_ADDR, DEFAULT_RPC_URL};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::{debug, info};
use std::path::Path;

/// Example: `REGSYNC_CHAIN__RPC_URL` -> `chain.rpc_url`
pub const ENV_PREFIX: &str = "REGSYNC_";

pub const CONFIG_FILE_NAME: &str = "regsync.toml";

/// Load configuration from the default file in `data_dir` (`regsync.toml`).
pub fn load_config(data_dir: &Path) -> Result<AppConfig> {
    load_config_from_file(&data_dir.join(CONFIG_FILE_NAME))
}

/// Load configuration from a specific file path. A missing file leaves defaults and env only.
pub fn load_config_from_file(path: &Path) -> Result<AppConfig> {
    info!("loading configuration path={}", path.display());
    let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        debug!("configuration file missing; using defaults and env only path={}", path.display());
    }
    let figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    let mut config: AppConfig =
        figment.extract().map_err(|e| RegsyncError::ConfigError(format!("config extraction failed: {e}")))?;
    postprocess(&mut config);

    debug!(
        "configuration loaded rpc_url={} chain_id={} delegation_enabled={} http_listen={}",
        redact_url(&config.chain.rpc_url),
        config.chain.chain_id,
        config.delegation.enabled,
        config.http.listen_addr
    );
    Ok(config)
}

fn postprocess(config: &mut AppConfig) {
    if config.chain.rpc_url.trim().is_empty() {
        config.chain.rpc_url = DEFAULT_RPC_URL.to_string();
    }
    if config.registry.chain_id == 0 {
        config.registry.chain_id = config.chain.chain_id;
    }
    if config.delegation.chain_id == 0 {
        config.delegation.chain_id = config.chain.chain_id;
    }
    if config.exclusions.poll_interval_secs == 0 {
        config.exclusions.poll_interval_secs = DEFAULT_EXCLUSION_POLL_SECS;
    }
    if config.http.listen_addr.trim().is_empty() {
        config.http.listen_addr = DEFAULT_HTTP_LISTEN_ADDR.to_string();
    }
    if config.runtime.max_batch_size == 0 {
        config.runtime.max_batch_size = MAX_IDENTITIES_PER_TRANSACTION;
    }
    if config.runtime.status_chunk_size == 0 {
        config.runtime.status_chunk_size = DEFAULT_STATUS_CHUNK_SIZE;
    }
}

pub(crate) fn redact_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let (scheme, rest) = url.split_at(scheme_end + 3);
    let Some(at) = rest.find('@') else {
        return url.to_string();
    };
    format!("{scheme}<redacted>@{}", &rest[at + 1..])
}
