use std::hash::{Hash, Hasher};

/// Ranks of the pivot terms making up one conjunction.
///
/// Keeps the order in which ranks were appended (the order predicates are
/// added to the conjunction) next to a sorted copy. Equality and hashing only
/// look at the sorted copy, so `{2, 0}` and `{0, 2}` are the same set.
#[derive(Debug, Clone, Default)]
pub struct TermIndexSet {
    order: Vec<usize>,
    sorted: Vec<usize>,
}

impl TermIndexSet {
    pub fn singleton(rank: usize) -> Self {
        Self {
            order: vec![rank],
            sorted: vec![rank],
        }
    }

    /// Append a rank
    /// Returns `false` and leaves the set untouched when the rank is present.
    pub fn push(&mut self, rank: usize) -> bool {
        match self.sorted.binary_search(&rank) {
            Ok(_) => false,
            Err(pos) => {
                self.sorted.insert(pos, rank);
                self.order.push(rank);
                true
            }
        }
    }

    #[inline]
    pub fn contains(&self, rank: usize) -> bool {
        self.sorted.binary_search(&rank).is_ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Ranks in append order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order.iter().copied()
    }

    /// Canonical (ascending) form used as cache and dedup key
    #[inline]
    pub fn key(&self) -> &[usize] {
        &self.sorted
    }
}

impl PartialEq for TermIndexSet {
    fn eq(&self, other: &Self) -> bool {
        self.sorted == other.sorted
    }
}

impl Eq for TermIndexSet {}

impl Hash for TermIndexSet {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.sorted.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_append_order() {
        let mut a = TermIndexSet::singleton(2);
        a.push(0);
        let mut b = TermIndexSet::singleton(0);
        b.push(2);
        assert_eq!(a, b);
        assert_eq!(a.key(), &[0, 2]);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![2, 0]);

        let set: HashSet<TermIndexSet> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn push_skips_present_ranks() {
        let mut s = TermIndexSet::singleton(1);
        assert!(s.push(3));
        assert!(!s.push(1));
        assert_eq!(s.len(), 2);
        assert!(s.contains(3));
        assert!(!s.contains(2));
    }
}
