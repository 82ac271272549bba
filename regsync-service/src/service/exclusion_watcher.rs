//! Keeps the engine's exclusion snapshot in step with the exclusion file on disk.

use log::{debug, info, warn};
use regsync_core::infrastructure::exclusions::ExclusionStore;
use regsync_core::Result;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::watch;

/// What the watcher compares between polls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct FileFingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

pub struct ExclusionWatcher {
    store: Arc<ExclusionStore>,
    path: PathBuf,
    last_seen: Option<FileFingerprint>,
}

impl ExclusionWatcher {
    /// `loaded` tells the watcher the store already holds the file's current contents.
    pub async fn new(store: Arc<ExclusionStore>, path: PathBuf, loaded: bool) -> Self {
        let last_seen = if loaded { fingerprint(&path).await } else { None };
        Self { store, path, last_seen }
    }

    /// Reload when the file changed since the last poll. Returns `true` when a new table was swapped in.
    pub async fn poll_once(&mut self) -> bool {
        let Some(current) = fingerprint(&self.path).await else {
            if self.last_seen.take().is_some() {
                warn!("exclusion file disappeared; keeping current list path={}", self.path.display());
            }
            return false;
        };
        if self.last_seen == Some(current) {
            return false;
        }
        self.last_seen = Some(current);
        let store = self.store.clone();
        let path = self.path.clone();
        match tokio::task::spawn_blocking(move || store.reload_from_file(&path)).await {
            Ok(Ok(table)) => {
                info!("exclusion file reloaded path={} version={} entries={}", self.path.display(), table.version(), table.len());
                true
            }
            Ok(Err(err)) => {
                warn!("exclusion file reload failed; keeping previous list path={} error={}", self.path.display(), err);
                false
            }
            Err(err) => {
                warn!("exclusion reload task failed; keeping previous list path={} error={}", self.path.display(), err);
                false
            }
        }
    }

    pub async fn run(mut self, poll_interval: Duration, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        info!("exclusion watcher started path={} poll_ms={}", self.path.display(), poll_interval.as_millis());
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.poll_once().await;
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        debug!("exclusion watcher stopping path={}", self.path.display());
                        return Ok(());
                    }
                }
            }
        }
    }
}

pub async fn run_exclusion_watcher(
    store: Arc<ExclusionStore>,
    path: PathBuf,
    poll_interval: Duration,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    ExclusionWatcher::new(store, path, true).await.run(poll_interval, shutdown).await
}

async fn fingerprint(path: &std::path::Path) -> Option<FileFingerprint> {
    let meta = tokio::fs::metadata(path).await.ok()?;
    Some(FileFingerprint { modified: meta.modified().ok(), len: meta.len() })
}
