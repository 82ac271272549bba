use alloy::signers::local::PrivateKeySigner;
use log::{info, warn};
use regsync_core::application::{EngineSettings, ReconciliationObserver, RegistrationEngine};
use regsync_core::infrastructure::chain::{ChainGateway, GatewaySettings};
use regsync_core::infrastructure::config::AppConfig;
use regsync_core::infrastructure::exclusions::{load_exclusion_file, ExclusionStore};
use regsync_core::infrastructure::logging::init_logger;
use regsync_core::infrastructure::rpc::AlloyExecutionRpc;
use regsync_core::infrastructure::signers::{SignatureSwapperClient, Web3SignerClient};
use regsync_core::infrastructure::status::MulticallStatusReader;
use regsync_core::{RegsyncError, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<()> {
    let log_dir = log_dir.map(|dir| dir.to_string_lossy().into_owned());
    init_logger(log_dir.as_deref(), level)
}

pub fn load_app_config() -> Result<Arc<AppConfig>> {
    let app_config = regsync_core::infrastructure::config::load_app_config()?;
    Ok(Arc::new(app_config))
}

pub async fn init_gateway(app_config: &AppConfig, shutdown: watch::Receiver<bool>) -> Result<Arc<ChainGateway>> {
    let rpc = Arc::new(AlloyExecutionRpc::connect(&app_config.chain.rpc_url)?);
    let signer = PrivateKeySigner::from_str(app_config.signing.private_key.trim())
        .map_err(|err| RegsyncError::ConfigError(format!("invalid signing.private_key: {err}")))?;
    let settings = GatewaySettings {
        chain_id: app_config.chain.chain_id,
        max_gas_price_wei: app_config.chain.max_gas_price_wei(),
        receipt_poll_interval: app_config.chain.receipt_poll_interval(),
        confirmation_timeout: app_config.chain.confirmation_timeout(),
        multicall_address: app_config.chain.multicall_address()?,
    };
    let gateway = ChainGateway::new(rpc, signer, settings).with_shutdown(shutdown);
    gateway.verify_chain_id().await?;
    Ok(Arc::new(gateway))
}

/// Initial exclusion table. A configured file that cannot be read is fatal at startup.
pub fn init_exclusions(app_config: &AppConfig) -> Result<(Arc<ExclusionStore>, Option<PathBuf>)> {
    let Some(path) = app_config.exclusions.path.as_deref().map(str::trim).filter(|p| !p.is_empty()).map(PathBuf::from) else {
        warn!("no exclusion list configured; every identity is eligible");
        return Ok((Arc::new(ExclusionStore::empty()), None));
    };
    let table = load_exclusion_file(&path, 1)?;
    info!("exclusion list loaded path={} entries={}", path.display(), table.len());
    Ok((Arc::new(ExclusionStore::new(table)), Some(path)))
}

pub fn init_engine(
    app_config: &AppConfig,
    gateway: Arc<ChainGateway>,
    exclusions: Arc<ExclusionStore>,
    observer: Arc<dyn ReconciliationObserver>,
) -> Result<RegistrationEngine> {
    let registry_address = app_config.registry.contract_address()?;
    let delegation_address = app_config.delegation.contract_address()?;
    let status_reader = MulticallStatusReader::new(
        gateway.clone(),
        registry_address,
        delegation_address,
        app_config.runtime.status_chunk_size,
    );
    let settings = EngineSettings {
        max_batch_size: app_config.runtime.max_batch_size,
        registry_address,
        delegation_address,
        payout_override: app_config.registry.payout_override()?,
    };

    let mut engine = RegistrationEngine::new(gateway, Arc::new(status_reader), exclusions, settings).with_observer(observer);
    if let Some(url) = app_config.remote_signer.url.as_deref().filter(|u| !u.trim().is_empty()) {
        let client = Web3SignerClient::new(url, Duration::from_secs(app_config.remote_signer.timeout_secs))?;
        engine = engine.with_remote_signer(Arc::new(client));
        info!("remote signer configured url={}", url);
    }
    if let Some(url) = app_config.secondary_signer.url.as_deref().filter(|u| !u.trim().is_empty()) {
        let client = SignatureSwapperClient::new(url, Duration::from_secs(app_config.secondary_signer.timeout_secs))?;
        engine = engine.with_secondary_signer(Arc::new(client));
        info!("secondary signer configured url={}", url);
    }
    Ok(engine)
}

pub fn log_startup_banner(app_config: &AppConfig, engine: &RegistrationEngine) {
    info!(
        "regsync engine ready chain_id={} signer={} registry={} delegation_enabled={} max_batch_size={} status_chunk_size={} payout_override={}",
        app_config.chain.chain_id,
        engine.signing_address(),
        app_config.registry.address,
        engine.delegation_enabled(),
        app_config.runtime.max_batch_size,
        app_config.runtime.status_chunk_size,
        app_config.registry.payout_recipient_override.as_deref().unwrap_or("<none>")
    );
}
