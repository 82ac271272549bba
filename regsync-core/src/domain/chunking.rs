use crate::foundation::BlsPublicKey;
use log::warn;
use std::collections::HashMap;
use std::ops::Range;

/// Collapse duplicate identities: the last item wins and takes the position of the first occurrence.
pub fn dedup_by_identity<T>(items: Vec<T>, identity: impl Fn(&T) -> BlsPublicKey) -> Vec<T> {
    let mut position: HashMap<BlsPublicKey, usize> = HashMap::with_capacity(items.len());
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        let pubkey = identity(&item);
        match position.get(&pubkey) {
            Some(&idx) => {
                warn!("duplicate identity in batch; keeping latest pubkey={} position={}", pubkey, idx);
                out[idx] = item;
            }
            None => {
                position.insert(pubkey, out.len());
                out.push(item);
            }
        }
    }
    out
}

/// Split `len` items into consecutive ranges of at most `max` items.
pub fn chunk_ranges(len: usize, max: usize) -> Vec<Range<usize>> {
    let max = max.max(1);
    (0..len).step_by(max).map(|start| start..(start + max).min(len)).collect()
}

/// Work queue of index ranges that can be halved when a range proves too large to serve in one call.
///
/// Ranges are handed out in ascending order; a split pushes both halves back so the lower half is next.
#[derive(Debug)]
pub struct RangeSplitter {
    pending: Vec<Range<usize>>,
}

impl RangeSplitter {
    pub fn new(len: usize, max: usize) -> Self {
        let mut pending = chunk_ranges(len, max);
        pending.reverse();
        Self { pending }
    }

    pub fn next_range(&mut self) -> Option<Range<usize>> {
        self.pending.pop()
    }

    /// Returns `false` when the range cannot be split any further.
    pub fn split(&mut self, range: Range<usize>) -> bool {
        if range.len() <= 1 {
            return false;
        }
        let mid = range.start + range.len() / 2;
        self.pending.push(mid..range.end);
        self.pending.push(range.start..mid);
        true
    }
}
