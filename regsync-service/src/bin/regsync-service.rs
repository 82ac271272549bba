#[path = "regsync-service/cli.rs"]
mod cli;
#[path = "regsync-service/setup.rs"]
mod setup;

use crate::cli::Cli;
use log::{debug, error, info, warn};
use regsync_core::application::{CompositeObserver, ReconciliationObserver};
use regsync_core::RegsyncError;
use regsync_service::api::{run_http_server, ApiState, DEFAULT_BODY_LIMIT_BYTES};
use regsync_service::service::exclusion_watcher::run_exclusion_watcher;
use regsync_service::service::metrics::Metrics;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse_args();
    setup::init_logging(&args.log_level, args.log_dir.as_deref())?;
    args.apply_to_env();
    info!("regsync-service starting log_level={}", args.log_level);

    let app_config = setup::load_app_config()?;
    info!(
        "config loaded chain_id={} delegation_enabled={} http_enabled={} exclusions_path={}",
        app_config.chain.chain_id,
        app_config.delegation.enabled,
        app_config.http.enabled,
        app_config.exclusions.path.as_deref().unwrap_or("<none>")
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let gateway = setup::init_gateway(&app_config, shutdown_rx.clone()).await?;
    let (exclusions, exclusions_path) = setup::init_exclusions(&app_config)?;

    let metrics = Arc::new(Metrics::new()?);
    let mut observer = CompositeObserver::new();
    observer.add_observer(metrics.clone());
    let observer: Arc<dyn ReconciliationObserver> = Arc::new(observer);
    let engine = Arc::new(setup::init_engine(&app_config, gateway, exclusions.clone(), observer)?);
    setup::log_startup_banner(&app_config, &engine);

    spawn_status_reporter(metrics.clone());

    if let Some(path) = exclusions_path {
        let poll = Duration::from_secs(app_config.exclusions.poll_interval_secs.max(1));
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move {
            if let Err(err) = run_exclusion_watcher(exclusions, path, poll, shutdown).await {
                warn!("exclusion watcher error: {}", err);
            }
        });
    }

    let server = if app_config.http.enabled {
        let addr: SocketAddr = app_config
            .http
            .listen_addr
            .parse()
            .map_err(|err| RegsyncError::ConfigError(format!("invalid http.listen_addr '{}': {err}", app_config.http.listen_addr)))?;
        let state = Arc::new(ApiState { engine: engine.clone(), metrics: metrics.clone(), body_limit: DEFAULT_BODY_LIMIT_BYTES });
        let shutdown = shutdown_rx.clone();
        Some(tokio::spawn(async move {
            debug!("http server task spawned");
            if let Err(err) = run_http_server(addr, state, shutdown).await {
                error!("http server error: {}", err);
            }
        }))
    } else {
        info!("http front door disabled; engine idle until shutdown");
        None
    };

    tokio::signal::ctrl_c().await.map_err(|err| RegsyncError::IoError { operation: "wait for ctrl-c".to_string(), details: err.to_string() })?;
    info!("shutdown signal received");
    let _ = shutdown_tx.send(true);
    if let Some(server) = server {
        if let Err(err) = server.await {
            warn!("http server task join failed: {}", err);
        }
    }
    info!("regsync-service stopped");
    Ok(())
}

fn spawn_status_reporter(metrics: Arc<Metrics>) {
    tokio::spawn(async move {
        let interval_seconds = 300u64;
        info!("status reporter started interval_seconds={}", interval_seconds);
        let mut interval = tokio::time::interval(Duration::from_secs(interval_seconds));
        loop {
            interval.tick().await;
            let snapshot = metrics.snapshot();
            info!(
                "periodic status report uptime_minutes={} identities_classified={} identities_omitted={} tx_confirmed={} tx_failed={} tx_unknown={} http_ok={} http_error={}",
                snapshot.uptime.as_secs() / 60,
                snapshot.identities_classified,
                snapshot.identities_omitted,
                snapshot.transactions_confirmed,
                snapshot.transactions_failed,
                snapshot.transactions_unknown,
                snapshot.http_ok,
                snapshot.http_error
            );
        }
    });
}
