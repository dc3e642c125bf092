use indexmap::IndexSet;
use tracing::{debug, instrument};

use crate::{
    category::LatentCategoryModel,
    error::{Result, SenseError},
    index::{DocId, DocumentIndex, FilterNode, SortOrder},
    vectorizer::{TermFrequencyVector, TermVectorSource},
};

/// Example documents gathered for a category
#[derive(Debug, Clone)]
pub struct Prototypes {
    /// the documents the examples came from, in hit order
    pub documents: Vec<DocId>,
    pub examples: Vec<TermFrequencyVector>,
    /// OR over every example term, first-seen order
    pub filter: FilterNode,
}

impl Prototypes {
    pub fn build_model(&self) -> Result<LatentCategoryModel> {
        LatentCategoryModel::build(&self.examples)
    }
}

/// Turn the top `limit` hits of `query` into category examples
///
/// # Errors
/// * `InvalidConfiguration` - `limit` is zero or the query matches nothing
/// * `IndexUnavailable` - passed through from the index or the vector source
#[instrument(skip_all, fields(query = %query, limit))]
pub fn collect_prototypes<I, V>(index: &I, source: &V, query: &FilterNode, limit: usize) -> Result<Prototypes>
where
    I: DocumentIndex + ?Sized,
    V: TermVectorSource + ?Sized,
{
    if limit == 0 {
        return Err(SenseError::invalid("prototype limit must be at least 1"));
    }
    let documents = index.search(query, &[], SortOrder::Relevance, 0, limit)?;
    if documents.is_empty() {
        return Err(SenseError::invalid(format!("query {query} matched no documents")));
    }

    let examples = documents
        .iter()
        .map(|&doc| source.term_vector(doc))
        .collect::<Result<Vec<_>>>()?;

    let mut terms: IndexSet<&str> = IndexSet::new();
    for example in &examples {
        terms.extend(example.terms());
    }
    debug!(documents = documents.len(), terms = terms.len(), "prototypes collected");
    let filter = FilterNode::Or(terms.into_iter().map(|t| FilterNode::Term(Box::from(t))).collect());

    Ok(Prototypes {
        documents,
        examples,
        filter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DEFAULT_PROTOTYPE_LIMIT, index::memory::InMemoryIndex, index::query::q};

    fn index() -> InMemoryIndex {
        let mut index = InMemoryIndex::new();
        let docs: [&[(&str, f64)]; 4] = [
            &[("ocean", 3.0), ("tide", 2.0)],
            &[("desert", 4.0), ("dune", 1.0)],
            &[("ocean", 1.0), ("reef", 5.0)],
            &[("ocean", 2.0), ("tide", 1.0), ("kelp", 2.0)],
        ];
        for doc in docs {
            index.add_document(TermFrequencyVector::from_pairs(doc.iter().copied()).unwrap());
        }
        index
    }

    #[test]
    fn hits_become_examples_and_filter() {
        let index = index();
        let found = collect_prototypes(&index, &index, &q::term("ocean"), DEFAULT_PROTOTYPE_LIMIT).unwrap();
        assert_eq!(found.documents, vec![0, 2, 3]);
        assert_eq!(found.examples.len(), 3);
        assert_eq!(found.filter.to_string(), "(ocean OR tide OR reef OR kelp)");

        let model = found.build_model().unwrap();
        let near = TermFrequencyVector::from_pairs([("ocean", 2.0), ("tide", 1.0)]).unwrap();
        let far = TermFrequencyVector::from_pairs([("desert", 2.0), ("dune", 1.0)]).unwrap();
        assert!(model.categorize(&near) < model.categorize(&far));
        assert_eq!(index.count(&found.filter).unwrap(), 3);
    }

    #[test]
    fn limit_caps_the_examples() {
        let index = index();
        let found = collect_prototypes(&index, &index, &q::term("ocean"), 2).unwrap();
        assert_eq!(found.documents, vec![0, 2]);
    }

    #[test]
    fn no_hits_is_invalid() {
        let index = index();
        let err = collect_prototypes(&index, &index, &q::term("glacier"), 10).unwrap_err();
        assert!(matches!(err, SenseError::InvalidConfiguration(_)));
        assert!(collect_prototypes(&index, &index, &q::term("ocean"), 0).is_err());
    }
}
