//! Reference salience oracles.

use crate::{
    error::Result,
    index::{memory::InMemoryIndex, SalienceOracle},
};

/// Salience equal to the term's normalized weight
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightSalience;

impl SalienceOracle for WeightSalience {
    fn score(&self, _term: &str, normalized_weight: f64) -> Result<f64> {
        Ok(normalized_weight)
    }
}

/// Normalized weight enriched by the term's inverse document frequency.
///
/// `salience = weight * ln(1 + N / (df + 1))`, so rare terms outrank common
/// terms of the same weight.
#[derive(Debug, Clone, Copy)]
pub struct IdfSalience<'a> {
    index: &'a InMemoryIndex,
}

impl<'a> IdfSalience<'a> {
    pub fn new(index: &'a InMemoryIndex) -> Self {
        Self { index }
    }

    pub fn idf(&self, term: &str) -> f64 {
        let doc_num = self.index.doc_num() as f64;
        let doc_freq = self.index.doc_freq(term) as f64;
        (1.0 + doc_num / (doc_freq + 1.0)).ln()
    }
}

impl SalienceOracle for IdfSalience<'_> {
    fn score(&self, term: &str, normalized_weight: f64) -> Result<f64> {
        Ok(normalized_weight * self.idf(term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TermFrequencyVector;

    #[test]
    fn rare_terms_outrank_common_ones() {
        let mut index = InMemoryIndex::new();
        for i in 0..10 {
            let tf = if i == 0 {
                TermFrequencyVector::from_pairs([("common", 1.0), ("rare", 1.0)]).unwrap()
            } else {
                TermFrequencyVector::from_pairs([("common", 1.0)]).unwrap()
            };
            index.add_document(tf);
        }
        let oracle = IdfSalience::new(&index);
        assert!(oracle.score("rare", 0.5).unwrap() > oracle.score("common", 0.5).unwrap());
        // unseen terms are the rarest
        assert!(oracle.score("unseen", 0.5).unwrap() > oracle.score("rare", 0.5).unwrap());
        assert_eq!(WeightSalience.score("anything", 0.25).unwrap(), 0.25);
    }
}
