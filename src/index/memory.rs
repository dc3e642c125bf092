use indexmap::IndexMap;
use tracing::debug;

use crate::{
    error::{Result, SenseError},
    index::{DocId, DocumentIndex, FilterNode, SortOrder},
    vectorizer::{TermFrequencyVector, TermVectorSource},
};

/// In-memory inverted index over term vectors.
///
/// Postings are kept sorted by document id, so every predicate evaluates to a
/// sorted id list and boolean nodes become linear merges. There is no scoring
/// model: `SortOrder::Relevance` falls back to document order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIndex {
    /// stored term vectors, position is the document id
    documents: Vec<TermFrequencyVector>,
    /// term -> ascending document ids
    postings: IndexMap<Box<str>, Vec<DocId>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document and return its id
    pub fn add_document(&mut self, vector: TermFrequencyVector) -> DocId {
        let id = self.documents.len();
        for term in vector.terms() {
            // ids are handed out in increasing order, pushing keeps postings sorted
            self.postings.entry(Box::from(term)).or_default().push(id);
        }
        self.documents.push(vector);
        id
    }

    pub fn doc_num(&self) -> usize {
        self.documents.len()
    }

    /// Number of documents containing `term`
    pub fn doc_freq(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, |ids| ids.len())
    }

    /// Sorted ids of the documents matching `node`
    pub fn evaluate(&self, node: &FilterNode) -> Vec<DocId> {
        match node {
            FilterNode::Term(term) => self.postings.get(&**term).cloned().unwrap_or_default(),
            FilterNode::Not(inner) => {
                let inner_ids = self.evaluate(inner);
                let mut result = Vec::with_capacity(self.documents.len().saturating_sub(inner_ids.len()));
                let mut inner_iter = inner_ids.into_iter().peekable();
                for idx in 0..self.documents.len() {
                    match inner_iter.peek() {
                        Some(&inner_idx) if inner_idx == idx => {
                            inner_iter.next();
                        }
                        _ => result.push(idx),
                    }
                }
                result
            }
            FilterNode::And(children) => {
                let mut iter = children.iter();
                let Some(first) = iter.next() else {
                    return (0..self.documents.len()).collect();
                };
                let mut acc = self.evaluate(first);
                for child in iter {
                    if acc.is_empty() {
                        break;
                    }
                    acc = intersect(&acc, &self.evaluate(child));
                }
                acc
            }
            FilterNode::Or(children) => children
                .iter()
                .fold(Vec::new(), |acc, child| union(&acc, &self.evaluate(child))),
        }
    }
}

fn intersect(left: &[DocId], right: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::with_capacity(left.len().min(right.len()));
    let mut l = 0;
    let mut r = 0;
    while l < left.len() && r < right.len() {
        match left[l].cmp(&right[r]) {
            std::cmp::Ordering::Less => l += 1,
            std::cmp::Ordering::Greater => r += 1,
            std::cmp::Ordering::Equal => {
                result.push(left[l]);
                l += 1;
                r += 1;
            }
        }
    }
    result
}

fn union(left: &[DocId], right: &[DocId]) -> Vec<DocId> {
    let mut result = Vec::with_capacity(left.len() + right.len());
    let mut l = 0;
    let mut r = 0;
    while l < left.len() && r < right.len() {
        match left[l].cmp(&right[r]) {
            std::cmp::Ordering::Less => {
                result.push(left[l]);
                l += 1;
            }
            std::cmp::Ordering::Greater => {
                result.push(right[r]);
                r += 1;
            }
            std::cmp::Ordering::Equal => {
                result.push(left[l]);
                l += 1;
                r += 1;
            }
        }
    }
    result.extend_from_slice(&left[l..]);
    result.extend_from_slice(&right[r..]);
    result
}

impl DocumentIndex for InMemoryIndex {
    fn count(&self, filter: &FilterNode) -> Result<u64> {
        Ok(self.evaluate(filter).len() as u64)
    }

    fn search(
        &self,
        filter: &FilterNode,
        other_filters: &[FilterNode],
        sort: SortOrder,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<DocId>> {
        let mut ids = self.evaluate(filter);
        for other in other_filters {
            if ids.is_empty() {
                break;
            }
            ids = intersect(&ids, &self.evaluate(other));
        }
        debug!(matched = ids.len(), ?sort, offset, limit, "in-memory search");
        Ok(ids.into_iter().skip(offset).take(limit).collect())
    }
}

impl TermVectorSource for InMemoryIndex {
    fn term_vector(&self, doc: DocId) -> Result<TermFrequencyVector> {
        self.documents
            .get(doc)
            .cloned()
            .ok_or_else(|| SenseError::unavailable(format!("document {doc} is not stored")))
    }
}
