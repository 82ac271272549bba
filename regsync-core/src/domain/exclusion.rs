use crate::foundation::BlsPublicKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExclusionEntry {
    #[serde(default)]
    pub exclude_registry: bool,
    #[serde(default)]
    pub exclude_native_delegation: bool,
}

/// On-disk record shape of the exclusion list.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExclusionRecord {
    pub pubkey: BlsPublicKey,
    #[serde(flatten)]
    pub entry: ExclusionEntry,
}

/// Immutable exclusion snapshot. A refresh builds a new table and swaps it in whole.
#[derive(Clone, Debug, Default)]
pub struct ExclusionTable {
    entries: HashMap<BlsPublicKey, ExclusionEntry>,
    version: u64,
}

impl ExclusionTable {
    pub fn new(entries: HashMap<BlsPublicKey, ExclusionEntry>, version: u64) -> Self {
        Self { entries, version }
    }

    /// Later records for the same key override earlier ones.
    pub fn from_records(records: Vec<ExclusionRecord>, version: u64) -> Self {
        let entries = records.into_iter().map(|record| (record.pubkey, record.entry)).collect();
        Self { entries, version }
    }

    pub fn entry(&self, pubkey: &BlsPublicKey) -> ExclusionEntry {
        self.entries.get(pubkey).copied().unwrap_or_default()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
