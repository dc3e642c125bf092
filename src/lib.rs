/// This crate reduces a large document collection to the few documents worth
/// scoring, and scores them against categories learned from examples.
pub mod category;
pub mod config;
pub mod error;
pub mod index;
pub mod reduction;
pub mod utils;
pub mod vectorizer;

/// Term Frequency Vector
/// A sparse mapping from term to non-negative weight.
/// Terms keep their insertion order, so everything derived from a vector
/// (pivot ranks, dictionary rows) is deterministic.
///
/// ```
/// use sense_redux::TermFrequencyVector;
///
/// let tf = TermFrequencyVector::from_pairs([("gas", 3.0), ("foot", 4.0)]).unwrap();
/// assert_eq!(tf.norm(), 5.0);
/// assert_eq!(tf.unit_vector().weight("foot"), Some(0.8));
/// ```
pub use vectorizer::TermFrequencyVector;

/// Adaptive Filter Builder
/// Turns a weighted query vector into a disjunction of term conjunctions.
/// Every clause matches at most `threshold` documents unless the ranked terms
/// run out first. Counts are asked from the `DocumentIndex` at most once per
/// distinct term set within one build.
///
/// # Thread Safety
/// The builder holds configuration only; concurrent `build` calls each own
/// their cache and dedup state.
pub use reduction::{AdaptiveFilterBuilder, BooleanFilter, BuildStats, Conjunction};

/// Latent Category Model
/// A category learned from example term vectors by singular value
/// decomposition. `categorize` returns the share of a query's magnitude that
/// the category subspace does not explain: 0.0 fits exactly, 1.0 not at all.
///
/// # Serialization
/// Supported via serde, `to_bytes` / `from_bytes` encode CBOR.
pub use category::{ExampleWeighting, LatentCategoryModel};

/// Category Registry
/// Named models behind `Arc`, rebuilt and swapped without blocking readers.
pub use category::registry::CategoryRegistry;

/// Prototype collection
/// Builds category examples from the top hits of an index query.
pub use category::prototype::{collect_prototypes, Prototypes};

pub use config::ReductionConfig;
pub use error::{Result, SenseError};

/// Collaborator interfaces
/// `DocumentIndex` answers counts and searches, `SalienceOracle` ranks query
/// terms. `InMemoryIndex` implements both the index and `TermVectorSource`.
pub use index::{memory::InMemoryIndex, DocId, DocumentIndex, FilterNode, SalienceOracle, SortOrder};
pub use index::salience::{IdfSalience, WeightSalience};
pub use vectorizer::TermVectorSource;
