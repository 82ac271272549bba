//! Exclusion list publication.
//!
//! Readers take an `Arc` snapshot under a short read lock and keep it for the whole
//! reconciliation; a refresh builds a new table off-lock and swaps the pointer.

use crate::domain::{ExclusionRecord, ExclusionTable};
use crate::foundation::{RegsyncError, Result};
use log::info;
use parking_lot::RwLock;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub struct ExclusionStore {
    current: RwLock<Arc<ExclusionTable>>,
    next_version: AtomicU64,
}

impl ExclusionStore {
    pub fn new(table: ExclusionTable) -> Self {
        let next_version = table.version() + 1;
        Self { current: RwLock::new(Arc::new(table)), next_version: AtomicU64::new(next_version) }
    }

    pub fn empty() -> Self {
        Self::new(ExclusionTable::default())
    }

    pub fn snapshot(&self) -> Arc<ExclusionTable> {
        self.current.read().clone()
    }

    pub fn replace(&self, table: ExclusionTable) {
        let entries = table.len();
        let version = table.version();
        *self.current.write() = Arc::new(table);
        info!("exclusion list swapped in version={} entries={}", version, entries);
    }

    /// Load `path` and swap it in. On error the current snapshot stays.
    pub fn reload_from_file(&self, path: &Path) -> Result<Arc<ExclusionTable>> {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        let table = load_exclusion_file(path, version)?;
        self.replace(table);
        Ok(self.snapshot())
    }
}

impl Default for ExclusionStore {
    fn default() -> Self {
        Self::empty()
    }
}

/// Parse a JSON array of `{ "pubkey", "exclude_registry", "exclude_native_delegation" }`.
pub fn load_exclusion_file(path: &Path, version: u64) -> Result<ExclusionTable> {
    let list_error = |details: String| RegsyncError::ExclusionListError { path: path.display().to_string(), details };
    let bytes = std::fs::read(path).map_err(|err| list_error(err.to_string()))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(ExclusionTable::new(Default::default(), version));
    }
    let records: Vec<ExclusionRecord> = serde_json::from_slice(&bytes).map_err(|err| list_error(err.to_string()))?;
    Ok(ExclusionTable::from_records(records, version))
}
