use std::collections::HashSet;

use ahash::RandomState;
use tracing::{debug, info, instrument, warn};

use crate::{
    config::ReductionConfig,
    error::{Result, SenseError},
    index::{DocId, DocumentIndex, FilterNode, SalienceOracle, SortOrder},
    reduction::{
        cache::CardinalityCache,
        filter::{BooleanFilter, BuildStats, Conjunction},
        index_set::TermIndexSet,
    },
    utils::sort::rank_desc_stable,
    vectorizer::TermFrequencyVector,
};

/// Builds a bounded-fanout boolean filter from a weighted query vector.
///
/// The most salient terms become pivots. A pivot selective enough on its own
/// (at most `threshold` matching documents) is kept as a single-term clause;
/// any other pivot is AND-ed with further pivots until the conjunction drops
/// under the threshold or the pivots run out.
///
/// The builder only holds configuration. Every `build` call owns a fresh
/// cardinality cache and dedup registry, so one builder can serve concurrent
/// calls.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveFilterBuilder {
    config: ReductionConfig,
}

impl AdaptiveFilterBuilder {
    pub fn new(config: ReductionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReductionConfig {
        &self.config
    }

    /// Build the filter for `vector`
    ///
    /// # Arguments
    /// * `vector` - weighted query terms
    /// * `salience` - ranks the terms
    /// * `index` - answers conjunction counts
    ///
    /// # Errors
    /// * `InvalidConfiguration` - empty vector or invalid config, raised before any collaborator call
    /// * `IndexUnavailable` - passed through from the oracle or the index
    #[instrument(skip_all, fields(terms = vector.size(), threshold = self.config.threshold))]
    pub fn build<S, I>(&self, vector: &TermFrequencyVector, salience: &S, index: &I) -> Result<BooleanFilter>
    where
        S: SalienceOracle + ?Sized,
        I: DocumentIndex + ?Sized,
    {
        self.config.validate()?;
        if vector.is_empty() {
            return Err(SenseError::invalid("query vector has no terms"));
        }
        let top_n = self.config.pivot_count(vector.size());
        let pivots = rank_pivots(vector, salience, top_n)?;
        debug!(pivots = ?pivots, "pivot set");

        let filter = FilterRun::new(index, &pivots, self.config.threshold).run()?;
        info!(
            clauses = filter.len(),
            index_queries = filter.stats.index_queries,
            cache_hits = filter.stats.cache_hits,
            "filter built"
        );
        Ok(filter)
    }

    /// Build the filter and materialize the bounded candidate set
    ///
    /// Searches once with the filter AND-ed with `other_filters`, returning at
    /// most `max_candidate_set_size` documents.
    pub fn candidate_set<S, I>(
        &self,
        vector: &TermFrequencyVector,
        other_filters: &[FilterNode],
        salience: &S,
        index: &I,
    ) -> Result<Vec<DocId>>
    where
        S: SalienceOracle + ?Sized,
        I: DocumentIndex + ?Sized,
    {
        let filter = self.build(vector, salience, index)?;
        debug!(filter = %filter, "candidate filter");
        let limit = self.config.max_candidate_set_size;
        let mut docs = index.search(&filter.to_node(), other_filters, SortOrder::Relevance, 0, limit)?;
        // an index that ignores `limit` must not widen the candidate set
        docs.truncate(limit);
        Ok(docs)
    }
}

/// The `top_n` most salient terms of `vector`, most salient first
fn rank_pivots<S>(vector: &TermFrequencyVector, salience: &S, top_n: usize) -> Result<Vec<Box<str>>>
where
    S: SalienceOracle + ?Sized,
{
    let unit = vector.unit_vector();
    let scores = unit
        .iter()
        .map(|(term, weight)| salience.score(term, weight))
        .collect::<Result<Vec<f64>>>()?;
    Ok(rank_desc_stable(&scores)
        .into_iter()
        .take(top_n)
        .filter_map(|i| unit.get_index(i).map(|(term, _)| Box::from(term)))
        .collect())
}

/// State of a single build: the cache, the emitted sets and the clauses.
struct FilterRun<'a, I: ?Sized> {
    index: &'a I,
    pivots: &'a [Box<str>],
    threshold: u64,
    cache: CardinalityCache,
    emitted: HashSet<Box<[usize]>, RandomState>,
    clauses: Vec<Conjunction>,
    duplicates_skipped: u64,
}

impl<'a, I> FilterRun<'a, I>
where
    I: DocumentIndex + ?Sized,
{
    fn new(index: &'a I, pivots: &'a [Box<str>], threshold: u64) -> Self {
        Self {
            index,
            pivots,
            threshold,
            cache: CardinalityCache::new(),
            emitted: HashSet::with_hasher(RandomState::new()),
            clauses: Vec::new(),
            duplicates_skipped: 0,
        }
    }

    fn run(mut self) -> Result<BooleanFilter> {
        let top_n = self.pivots.len();
        for zz in 0..top_n {
            let single = TermIndexSet::singleton(zz);
            let count = self.count(&single)?;
            if count <= self.threshold {
                self.emit(single, count);
                continue;
            }
            debug!(pivot = %self.pivots[zz], count, "pivot too broad, widening");
            for yy in (0..top_n).filter(|&yy| yy != zz) {
                let (set, count) = self.widen(&single, count, yy)?;
                if count > self.threshold {
                    warn!(pivot = %self.pivots[zz], count, "pivots exhausted above threshold");
                }
                self.emit(set, count);
            }
        }
        Ok(BooleanFilter {
            clauses: self.clauses,
            stats: BuildStats {
                pivots: top_n,
                index_queries: self.cache.misses(),
                cache_hits: self.cache.hits(),
                duplicates_skipped: self.duplicates_skipped,
            },
        })
    }

    /// Append ranks `start..top_n` to `base` until the count is at most the threshold
    fn widen(&mut self, base: &TermIndexSet, base_count: u64, start: usize) -> Result<(TermIndexSet, u64)> {
        let mut set = base.clone();
        let mut count = base_count;
        let mut rank = start;
        while count > self.threshold && rank < self.pivots.len() {
            set.push(rank);
            count = self.count(&set)?;
            rank += 1;
        }
        Ok((set, count))
    }

    fn count(&mut self, set: &TermIndexSet) -> Result<u64> {
        let index = self.index;
        let pivots = self.pivots;
        self.cache
            .get_or_try_insert_with(set, || index.count(&conjunction_node(pivots, set)))
    }

    /// Add a clause unless its set was emitted before
    fn emit(&mut self, set: TermIndexSet, count: u64) -> bool {
        if self.emitted.contains(set.key()) {
            self.duplicates_skipped += 1;
            return false;
        }
        self.emitted.insert(Box::from(set.key()));
        let terms = set.iter().map(|rank| self.pivots[rank].clone()).collect();
        self.clauses.push(Conjunction {
            indices: set,
            terms,
            count,
        });
        true
    }
}

fn conjunction_node(pivots: &[Box<str>], set: &TermIndexSet) -> FilterNode {
    FilterNode::And(set.iter().map(|rank| FilterNode::Term(pivots[rank].clone())).collect())
}
