//! Concurrent k-mer count aggregation.

use dashmap::DashMap;
use rayon::prelude::{ParallelBridge, ParallelIterator};
use rustc_hash::FxHasher;
use std::{collections::HashMap, hash::BuildHasherDefault};

/// Final k-mer counts, keyed by k-mer string.
pub type KmerTable = HashMap<String, u64>;

/// A custom `DashMap` w/ `FxHasher`.
type DashFx = DashMap<Box<[u8]>, u64, BuildHasherDefault<FxHasher>>;

/// Shared k-mer counter updated by every scanner of one run.
///
/// The underlying map is sharded, so increments of different k-mers rarely
/// contend; increments of the same k-mer are serialized by its shard lock
/// and never lost.
#[derive(Debug)]
pub struct KmerAggregator(DashFx);

impl Default for KmerAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl KmerAggregator {
    pub fn new() -> Self {
        Self(DashMap::with_hasher(BuildHasherDefault::<FxHasher>::default()))
    }

    /// Adds one occurrence of `kmer`, inserting it with a count of 1 if unseen.
    pub fn increment(&self, kmer: &[u8]) {
        // Already-seen k-mers are the common case; avoid the key allocation.
        if let Some(mut count) = self.0.get_mut(kmer) {
            *count += 1;
            return;
        }
        *self.0.entry(Box::from(kmer)).or_insert(0) += 1;
    }

    /// Number of distinct k-mers seen so far.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copies the current counts into a plain map.
    ///
    /// Only meaningful once every scanner has finished.
    pub fn snapshot(&self) -> KmerTable {
        self.0
            .iter()
            .map(|entry| (key_to_string(entry.key()), *entry.value()))
            .collect()
    }

    /// Consumes the aggregator, converting keys to strings in parallel.
    pub fn into_table(self) -> KmerTable {
        self.0
            .into_iter()
            .par_bridge()
            .map(|(kmer, count)| (key_to_string(&kmer), count))
            .collect()
    }
}

fn key_to_string(kmer: &[u8]) -> String {
    String::from_utf8_lossy(kmer).into_owned()
}
