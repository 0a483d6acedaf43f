//! Insertion Order Module
//!
//! Tracks insertion order of fingerprints for oldest-first eviction.

use std::collections::{BTreeMap, HashMap};

use crate::cache::Fingerprint;

// == Insertion Order ==
/// Tracks keys by insertion time.
///
/// Each insertion is stamped with an increasing sequence number; the
/// smallest live sequence is the oldest key. Push, remove and pop are
/// O(log n).
///
/// Reads do not reorder keys; re-inserting a key (overwrite) moves it to the
/// back because its TTL restarts.
#[derive(Debug, Default)]
pub struct InsertionOrder {
    /// Sequence number -> key, oldest first
    by_seq: BTreeMap<u64, Fingerprint>,
    /// Key -> its current sequence number
    seq_of: HashMap<Fingerprint, u64>,
    next_seq: u64,
}

impl InsertionOrder {
    pub fn new() -> Self {
        Self::default()
    }

    // == Push ==
    /// Records `key` as the newest insertion, dropping any earlier position.
    pub fn push(&mut self, key: &Fingerprint) {
        self.remove(key);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.by_seq.insert(seq, key.clone());
        self.seq_of.insert(key.clone(), seq);
    }

    // == Remove ==
    pub fn remove(&mut self, key: &Fingerprint) {
        if let Some(seq) = self.seq_of.remove(key) {
            self.by_seq.remove(&seq);
        }
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest key, or None if empty.
    pub fn pop_oldest(&mut self) -> Option<Fingerprint> {
        let (_, key) = self.by_seq.pop_first()?;
        self.seq_of.remove(&key);
        Some(key)
    }

    pub fn peek_oldest(&self) -> Option<&Fingerprint> {
        self.by_seq.values().next()
    }

    pub fn clear(&mut self) {
        self.by_seq.clear();
        self.seq_of.clear();
    }

    pub fn len(&self) -> usize {
        self.seq_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq_of.is_empty()
    }

    pub fn contains(&self, key: &Fingerprint) -> bool {
        self.seq_of.contains_key(key)
    }
}
