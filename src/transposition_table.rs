use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CacheError {
    #[error("no entry for fingerprint {0:#018x}")]
    NotFound(u64),
}

/// Fingerprint -> score memo shared by every search an agent runs.
///
/// Entries are never evicted and carry no depth or bound information: a score
/// stored after a cutoff is handed back as if it were exact.
#[derive(Debug, Clone, Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, f64>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn contains(&self, key: u64) -> bool {
        self.entries.contains_key(&key)
    }

    pub fn get(&self, key: u64) -> Result<f64, CacheError> {
        self.probe(key).ok_or(CacheError::NotFound(key))
    }

    #[inline]
    pub fn probe(&self, key: u64) -> Option<f64> {
        self.entries.get(&key).copied()
    }

    /// Last writer wins.
    #[inline]
    pub fn put(&mut self, key: u64, score: f64) {
        self.entries.insert(key, score);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
