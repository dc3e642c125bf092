pub mod term;

use crate::error::Result;
use crate::index::DocId;

pub use term::TermFrequencyVector;

/// Produces term vectors for stored documents.
///
/// Building vectors from raw text or index postings happens behind this trait;
/// the rest of the crate only consumes finished `TermFrequencyVector`s.
pub trait TermVectorSource {
    /// Term vector of one stored document
    /// Fails with `IndexUnavailable` when the document or its vector cannot be read.
    fn term_vector(&self, doc: DocId) -> Result<TermFrequencyVector>;
}
