//! Memoized alignment costs keyed by unordered sequence-index pairs
//!
//! Both caches store one entry per canonical `(min, max)` pair, so a cost
//! written for `(i, j)` is the cost read back for `(j, i)`. Diagonal pairs are
//! never stored.

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use crate::types::Cost;

/// Canonical unordered pair of distinct sequence indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    low: usize,
    high: usize,
}

impl PairKey {
    /// Returns `None` for `i == j`; self-pairs are never cached.
    pub fn new(i: usize, j: usize) -> Option<Self> {
        match i.cmp(&j) {
            std::cmp::Ordering::Less => Some(Self { low: i, high: j }),
            std::cmp::Ordering::Greater => Some(Self { low: j, high: i }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> usize {
        self.low
    }

    pub fn high(&self) -> usize {
        self.high
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Single-threaded cache owned by one `ScoreMatrixEngine`.
#[derive(Debug, Clone, Default)]
pub struct SymmetricCostCache {
    costs: HashMap<PairKey, Cost>,
    hits: u64,
    misses: u64,
}

impl SymmetricCostCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read without touching the hit/miss counters.
    pub fn get(&self, i: usize, j: usize) -> Option<Cost> {
        PairKey::new(i, j).and_then(|key| self.costs.get(&key).copied())
    }

    /// Read and record a hit or a miss.
    pub fn lookup(&mut self, i: usize, j: usize) -> Option<Cost> {
        let found = self.get(i, j);
        if found.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        found
    }

    /// Store `cost` for both orderings of `{i, j}`. Self-pairs are ignored.
    pub fn insert(&mut self, i: usize, j: usize, cost: Cost) {
        if let Some(key) = PairKey::new(i, j) {
            self.costs.insert(key, cost);
        }
    }

    pub fn contains(&self, i: usize, j: usize) -> bool {
        self.get(i, j).is_some()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    pub fn clear(&mut self) {
        self.costs.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            entries: self.costs.len(),
        }
    }
}

/// Cache shared across rayon workers.
///
/// Each pair owns a `OnceLock` slot. Inserting the slot is atomic under the
/// shard lock; the computation runs outside it, and racing callers for the
/// same pair wait on the slot, so every unordered pair is computed once.
#[derive(Debug, Default)]
pub struct ConcurrentCostCache {
    slots: DashMap<PairKey, Arc<OnceLock<Cost>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ConcurrentCostCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, i: usize, j: usize) -> Option<Cost> {
        let key = PairKey::new(i, j)?;
        self.slots.get(&key).and_then(|slot| slot.get().copied())
    }

    /// Return the cached cost of `key`, running `compute` if no thread has yet.
    /// The flag is `true` when this call performed the computation.
    pub fn get_or_compute<F>(&self, key: PairKey, compute: F) -> (Cost, bool)
    where
        F: FnOnce() -> Cost,
    {
        let slot = Arc::clone(
            &*self
                .slots
                .entry(key)
                .or_insert_with(|| Arc::new(OnceLock::new())),
        );

        let mut computed = false;
        let cost = *slot.get_or_init(|| {
            computed = true;
            compute()
        });

        if computed {
            self.misses.fetch_add(1, Ordering::Relaxed);
        } else {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        (cost, computed)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.slots.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_pair_key_is_canonical() {
        assert_eq!(PairKey::new(2, 5), PairKey::new(5, 2));
        let key = PairKey::new(9, 1).unwrap();
        assert_eq!((key.low(), key.high()), (1, 9));
        assert_eq!(PairKey::new(3, 3), None);
    }

    #[test]
    fn test_insert_serves_both_orderings() {
        let mut cache = SymmetricCostCache::new();
        cache.insert(1, 4, -7);
        assert_eq!(cache.get(1, 4), Some(-7));
        assert_eq!(cache.get(4, 1), Some(-7));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_diagonal_never_cached() {
        let mut cache = SymmetricCostCache::new();
        cache.insert(2, 2, 0);
        assert!(cache.is_empty());
        assert!(!cache.contains(2, 2));
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut cache = SymmetricCostCache::new();
        cache.insert(0, 1, 10);
        cache.insert(1, 0, 12);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(0, 1), Some(12));
    }

    #[test]
    fn test_lookup_counts_hits_and_misses() {
        let mut cache = SymmetricCostCache::new();
        assert_eq!(cache.lookup(0, 1), None);
        cache.insert(0, 1, 3);
        assert_eq!(cache.lookup(1, 0), Some(3));
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 1,
                misses: 1,
                entries: 1
            }
        );
        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_concurrent_computes_once_per_pair() {
        let cache = ConcurrentCostCache::new();
        let calls = AtomicUsize::new(0);
        let key = PairKey::new(0, 1).unwrap();

        let results: Vec<(Cost, bool)> = (0..64)
            .into_par_iter()
            .map(|_| {
                cache.get_or_compute(key, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    42
                })
            })
            .collect();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|(cost, _)| *cost == 42));
        assert_eq!(results.iter().filter(|(_, computed)| *computed).count(), 1);

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 63);
        assert_eq!(stats.entries, 1);
    }

    #[test]
    fn test_concurrent_get_is_symmetric() {
        let cache = ConcurrentCostCache::new();
        assert_eq!(cache.get(3, 2), None);
        cache.get_or_compute(PairKey::new(3, 2).unwrap(), || 8);
        assert_eq!(cache.get(2, 3), Some(8));
        assert_eq!(cache.get(3, 2), Some(8));
        assert_eq!(cache.get(3, 3), None);
    }
}
