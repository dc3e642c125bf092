use std::fmt;

use crate::{index::FilterNode, reduction::index_set::TermIndexSet};

/// One AND-ed group of term predicates
#[derive(Debug, Clone, PartialEq)]
pub struct Conjunction {
    /// pivot ranks of the terms
    pub indices: TermIndexSet,
    /// terms in the order they were added
    pub terms: Vec<Box<str>>,
    /// documents matched by this conjunction alone
    pub count: u64,
}

impl Conjunction {
    pub fn to_node(&self) -> FilterNode {
        FilterNode::And(self.terms.iter().map(|t| FilterNode::Term(t.clone())).collect())
    }
}

/// Counters collected while building a filter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// size of the pivot set
    pub pivots: usize,
    /// count queries sent to the document index
    pub index_queries: u64,
    /// count lookups answered by the cardinality cache
    pub cache_hits: u64,
    /// conjunctions dropped because their term set was already emitted
    pub duplicates_skipped: u64,
}

/// Disjunction of conjunctions bounding the candidate set.
///
/// No two clauses share the same term-index set.
#[derive(Debug, Clone, Default)]
pub struct BooleanFilter {
    pub(crate) clauses: Vec<Conjunction>,
    pub(crate) stats: BuildStats,
}

impl BooleanFilter {
    pub fn clauses(&self) -> &[Conjunction] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn stats(&self) -> BuildStats {
        self.stats
    }

    /// Whether a clause with exactly these pivot ranks is present
    pub fn contains(&self, ranks: &[usize]) -> bool {
        let mut key = ranks.to_vec();
        key.sort_unstable();
        key.dedup();
        self.clauses.iter().any(|c| c.indices.key() == key.as_slice())
    }

    /// Predicate tree to hand to a `DocumentIndex`
    pub fn to_node(&self) -> FilterNode {
        FilterNode::Or(self.clauses.iter().map(Conjunction::to_node).collect())
    }
}

impl fmt::Display for BooleanFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " OR ")?;
            }
            write!(f, "({})", clause.terms.join(" AND "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clause(ranks: &[usize], terms: &[&str]) -> Conjunction {
        let mut indices = TermIndexSet::singleton(ranks[0]);
        ranks[1..].iter().for_each(|&r| {
            indices.push(r);
        });
        Conjunction {
            indices,
            terms: terms.iter().map(|t| Box::from(*t)).collect(),
            count: 0,
        }
    }

    #[test]
    fn renders_and_converts() {
        let filter = BooleanFilter {
            clauses: vec![clause(&[0], &["gas"]), clause(&[1, 0], &["foot", "gas"])],
            stats: BuildStats::default(),
        };
        assert_eq!(filter.to_string(), "(gas) OR (foot AND gas)");
        assert_eq!(filter.to_node().to_string(), "((gas) OR (foot AND gas))");
        assert!(filter.contains(&[0, 1]));
        assert!(!filter.contains(&[1]));
    }
}
