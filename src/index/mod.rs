pub mod memory;
pub mod query;
pub mod salience;

use crate::error::Result;

pub use query::FilterNode;

/// Identifier of a stored document
pub type DocId = usize;

/// Order in which `DocumentIndex::search` returns documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Index-defined relevance
    #[default]
    Relevance,
    /// Ascending document id
    IndexOrder,
}

/// Document collection the filter is evaluated against.
///
/// Implementations must be deterministic for a fixed snapshot and tolerate
/// concurrent read-only calls.
pub trait DocumentIndex {
    /// Exact number of documents matching `filter`
    fn count(&self, filter: &FilterNode) -> Result<u64>;

    /// Documents matching `filter` and every entry of `other_filters`,
    /// ordered by `sort`, skipping `offset` and returning at most `limit`
    fn search(
        &self,
        filter: &FilterNode,
        other_filters: &[FilterNode],
        sort: SortOrder,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<DocId>>;
}

/// Salience lookup used to rank query terms.
///
/// Each call stands alone; implementations must not depend on earlier calls.
pub trait SalienceOracle {
    /// Salience of `term` carrying `normalized_weight` in a unit query vector
    fn score(&self, term: &str, normalized_weight: f64) -> Result<f64>;
}

impl<F> SalienceOracle for F
where
    F: Fn(&str, f64) -> Result<f64>,
{
    fn score(&self, term: &str, normalized_weight: f64) -> Result<f64> {
        self(term, normalized_weight)
    }
}
