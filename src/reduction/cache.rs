use std::collections::HashMap;

use ahash::RandomState;

use crate::{error::Result, reduction::index_set::TermIndexSet};

/// Document counts of the conjunctions seen in one filter build.
///
/// Keyed on the canonical form of a `TermIndexSet`. Entries are never replaced:
/// a set always describes the same conjunction within one build, so its count
/// cannot change.
#[derive(Debug, Default)]
pub struct CardinalityCache {
    counts: HashMap<Box<[usize]>, u64, RandomState>,
    hits: u64,
    misses: u64,
}

impl CardinalityCache {
    pub fn new() -> Self {
        Self {
            counts: HashMap::with_hasher(RandomState::new()),
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&self, set: &TermIndexSet) -> Option<u64> {
        self.counts.get(set.key()).copied()
    }

    /// Cached count of `set`, running `query` only on a miss
    /// A failed query leaves the cache unchanged.
    pub fn get_or_try_insert_with<F>(&mut self, set: &TermIndexSet, query: F) -> Result<u64>
    where
        F: FnOnce() -> Result<u64>,
    {
        if let Some(&count) = self.counts.get(set.key()) {
            self.hits += 1;
            return Ok(count);
        }
        let count = query()?;
        self.misses += 1;
        self.counts.insert(Box::from(set.key()), count);
        Ok(count)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Number of index queries issued through the cache
    pub fn misses(&self) -> u64 {
        self.misses
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SenseError;

    #[test]
    fn second_lookup_is_served_from_cache() {
        let mut cache = CardinalityCache::new();
        let mut a = TermIndexSet::singleton(0);
        a.push(1);
        let mut b = TermIndexSet::singleton(1);
        b.push(0);

        assert_eq!(cache.get_or_try_insert_with(&a, || Ok(42)).unwrap(), 42);
        let again = cache
            .get_or_try_insert_with(&b, || panic!("index must not be queried twice"))
            .unwrap();
        assert_eq!(again, 42);
        assert_eq!((cache.hits(), cache.misses(), cache.len()), (1, 1, 1));
    }

    #[test]
    fn failed_query_is_not_cached() {
        let mut cache = CardinalityCache::new();
        let s = TermIndexSet::singleton(4);
        let err = cache.get_or_try_insert_with(&s, || Err(SenseError::unavailable("down")));
        assert!(err.is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.get(&s), None);
    }
}
