use indexmap::IndexMap;
use num::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Result, SenseError},
    utils::math::dense,
};

/// TermFrequencyVector struct
/// An immutable, insertion-ordered bag of (term, weight) pairs describing a
/// document or a query.
///
/// Terms are unique. Iteration follows insertion order, which is also the
/// tie-break order when terms are ranked by salience.
///
/// # Examples
/// ```
/// use sense_redux::TermFrequencyVector;
/// let tf = TermFrequencyVector::from_pairs([("spiral", 3u32), ("gas", 4), ("spiral", 0)]).unwrap();
///
/// assert_eq!(tf.size(), 2);
/// assert_eq!(tf.norm(), 5.0);
/// assert_eq!(tf.unit_vector().weight("gas"), Some(0.8));
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(try_from = "RawTermWeights")]
pub struct TermFrequencyVector {
    pub(crate) weights: IndexMap<Box<str>, f64>,
}

/// Wire shape of `TermFrequencyVector`, checked on the way in
#[derive(Deserialize)]
struct RawTermWeights {
    weights: IndexMap<Box<str>, f64>,
}

impl TryFrom<RawTermWeights> for TermFrequencyVector {
    type Error = SenseError;

    fn try_from(raw: RawTermWeights) -> Result<Self> {
        Self::from_pairs(raw.weights)
    }
}

impl TermFrequencyVector {
    /// Create an empty vector
    pub fn new() -> Self {
        Self {
            weights: IndexMap::new(),
        }
    }

    /// Build a vector from (term, weight) pairs
    /// A term seen twice keeps its first position and sums its weights.
    ///
    /// # Arguments
    /// * `pairs` - terms with non-negative, finite weights
    pub fn from_pairs<I, S, W>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, W)>,
        S: AsRef<str>,
        W: ToPrimitive,
    {
        let mut weights: IndexMap<Box<str>, f64> = IndexMap::new();
        for (term, weight) in pairs {
            let term = term.as_ref();
            let weight = weight
                .to_f64()
                .filter(|w| w.is_finite() && *w >= 0.0)
                .ok_or_else(|| SenseError::invalid(format!("term {term:?} has an unusable weight")))?;
            let total = weights.entry(Box::from(term)).or_insert(0.0);
            *total += weight;
            if !total.is_finite() {
                return Err(SenseError::invalid(format!("summed weight of term {term:?} overflows")));
            }
        }
        Ok(Self { weights })
    }

    /// Number of distinct terms
    #[inline]
    pub fn size(&self) -> usize {
        self.weights.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    #[inline]
    pub fn weight(&self, term: &str) -> Option<f64> {
        self.weights.get(term).copied()
    }

    #[inline]
    pub fn contains(&self, term: &str) -> bool {
        self.weights.contains_key(term)
    }

    /// Term and weight at an insertion position
    #[inline]
    pub fn get_index(&self, idx: usize) -> Option<(&str, f64)> {
        self.weights.get_index(idx).map(|(t, w)| (&**t, *w))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.weights.iter().map(|(t, w)| (&**t, *w))
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.weights.keys().map(|t| &**t)
    }

    #[inline]
    pub fn norm_sq(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum()
    }

    /// Euclidean norm of the weights
    /// Scaled internally, only overflows when the true norm exceeds `f64::MAX`.
    pub fn norm(&self) -> f64 {
        let weights: Vec<f64> = self.weights.values().copied().collect();
        dense::norm(&weights)
    }

    /// Same terms scaled to unit Euclidean length
    /// A vector without weight stays the zero vector.
    pub fn unit_vector(&self) -> Self {
        let mut unit: Vec<f64> = self.weights.values().copied().collect();
        dense::normalize(&mut unit);
        Self {
            weights: self.weights.keys().cloned().zip(unit).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order_and_sums_repeats() {
        let tf = TermFrequencyVector::from_pairs([("b", 1.0), ("a", 2.0), ("b", 3.0)]).unwrap();
        assert_eq!(tf.terms().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(tf.weight("b"), Some(4.0));
        assert_eq!(tf.get_index(1), Some(("a", 2.0)));
    }

    #[test]
    fn rejects_negative_and_non_finite_weights() {
        assert!(TermFrequencyVector::from_pairs([("a", -1.0)]).is_err());
        assert!(TermFrequencyVector::from_pairs([("a", f64::NAN)]).is_err());
        assert!(TermFrequencyVector::from_pairs([("a", f64::INFINITY)]).is_err());
    }

    #[test]
    fn rejects_repeats_summing_past_f64_max() {
        let err = TermFrequencyVector::from_pairs([("a", 1e308), ("a", 1e308)]).unwrap_err();
        assert!(matches!(err, SenseError::InvalidConfiguration(_)));
        assert!(TermFrequencyVector::from_pairs([("a", 1e308), ("b", 1e308)]).is_ok());
    }

    #[test]
    fn deserialization_applies_the_same_checks() {
        let tf: TermFrequencyVector = serde_json::from_str(r#"{"weights":{"a":2.0,"b":1.0}}"#).unwrap();
        assert_eq!(tf.weight("a"), Some(2.0));
        assert_eq!(serde_json::to_string(&tf).unwrap(), r#"{"weights":{"a":2.0,"b":1.0}}"#);
        assert!(serde_json::from_str::<TermFrequencyVector>(r#"{"weights":{"a":-5.0,"b":1.0}}"#).is_err());
    }

    #[test]
    fn norm_of_huge_weights_stays_finite() {
        let tf = TermFrequencyVector::from_pairs([("a", 3e200), ("b", 4e200)]).unwrap();
        assert!((tf.norm() / 5e200 - 1.0).abs() < 1e-15);
        let unit = tf.unit_vector();
        assert!((unit.weight("b").unwrap() - 0.8).abs() < 1e-15);

        let edge = TermFrequencyVector::from_pairs([("a", 1.5e308), ("b", 1.5e308)]).unwrap();
        assert!(edge.norm().is_infinite());
        assert!((edge.unit_vector().norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn unit_vector_has_unit_norm() {
        let tf = TermFrequencyVector::from_pairs([("x", 1u64), ("y", 2), ("z", 2)]).unwrap();
        let unit = tf.unit_vector();
        assert!((unit.norm() - 1.0).abs() < 1e-12);
        assert!((unit.weight("y").unwrap() - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn unit_vector_of_empty_is_empty() {
        let tf = TermFrequencyVector::new();
        assert!(tf.unit_vector().is_empty());
        let zero = TermFrequencyVector::from_pairs([("a", 0.0)]).unwrap();
        assert_eq!(zero.unit_vector().weight("a"), Some(0.0));
    }
}
