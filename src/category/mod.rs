//! Latent-semantic category model.
//!
//! A category is learned from a handful of example term vectors. The examples
//! form the columns of a term-by-example matrix whose left singular vectors
//! span the category subspace; a document fits the category as well as its
//! term vector is explained by that subspace.

pub mod prototype;
pub mod registry;
pub mod serde;

use ::serde::{Deserialize, Serialize};
use indexmap::IndexSet;
use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{
    error::{Result, SenseError},
    utils::math::{
        dense::{norm, norm_sq, normalize, residual},
        svd::thin_svd,
    },
    vectorizer::TermFrequencyVector,
};

/// How example columns are scaled before the decomposition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExampleWeighting {
    /// every example scaled to unit length, each example weighs the same
    #[default]
    UnitLength,
    /// raw term weights, longer examples dominate the leading directions
    Raw,
}

/// Rank-reduced subspace model built from example term vectors.
///
/// Immutable once built; `categorize` takes `&self` and can be called from any
/// number of threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatentCategoryModel {
    /// term -> row, first-seen order across the examples
    pub(crate) dictionary: IndexSet<Box<str>>,
    /// raw weights, one column per example
    pub(crate) matrix: Vec<Vec<f64>>,
    pub(crate) weighting: ExampleWeighting,
    /// descending
    pub(crate) singular_values: Vec<f64>,
    /// orthonormal term-space basis, one column per retained singular value
    pub(crate) basis: Vec<Vec<f64>>,
    /// reconstruction error of the decomposed matrix
    pub(crate) model_score: f64,
}

impl LatentCategoryModel {
    /// Build with unit-length example weighting
    pub fn build(examples: &[TermFrequencyVector]) -> Result<Self> {
        Self::build_with(examples, ExampleWeighting::default())
    }

    /// Build the model from `examples`
    ///
    /// # Errors
    /// * `InvalidConfiguration` - no examples, no terms, non-finite weights, or
    ///   a decomposition that does not converge
    #[instrument(skip_all, fields(examples = examples.len(), weighting = ?weighting))]
    pub fn build_with(examples: &[TermFrequencyVector], weighting: ExampleWeighting) -> Result<Self> {
        if examples.is_empty() {
            return Err(SenseError::invalid("category needs at least one example"));
        }

        let mut dictionary: IndexSet<Box<str>> = IndexSet::new();
        for example in examples {
            for term in example.terms() {
                if !dictionary.contains(term) {
                    dictionary.insert(Box::from(term));
                }
            }
        }
        if dictionary.is_empty() {
            return Err(SenseError::invalid("category examples carry no terms"));
        }

        let rows = dictionary.len();
        let matrix: Vec<Vec<f64>> = examples
            .iter()
            .map(|example| {
                let mut column = vec![0.0; rows];
                for (term, weight) in example.iter() {
                    if let Some(row) = dictionary.get_index_of(term) {
                        column[row] = weight;
                    }
                }
                column
            })
            .collect();
        if matrix.iter().flatten().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(SenseError::invalid("category examples contain negative or non-finite weights"));
        }

        let decomposed = scaled_columns(&matrix, weighting);
        let svd = thin_svd(&decomposed, rows)
            .ok_or_else(|| SenseError::invalid("singular value decomposition of the examples failed"))?;

        let residuals: Vec<f64> = decomposed.iter().map(|column| norm(&residual(&svd.u, column))).collect();
        let model_score = norm(&residuals);
        let has_weight = decomposed.iter().flatten().any(|w| *w > 0.0);
        if !model_score.is_finite()
            || svd.singular_values.iter().any(|s| !s.is_finite())
            || (has_weight && svd.rank() == 0)
        {
            return Err(SenseError::invalid("decomposition of the examples is numerically unusable"));
        }
        debug!(
            terms = rows,
            rank = svd.rank(),
            singular_values = ?svd.singular_values,
            model_score,
            "category model built"
        );

        Ok(Self {
            dictionary,
            matrix,
            weighting,
            singular_values: svd.singular_values,
            basis: svd.u,
            model_score,
        })
    }

    /// Share of the query's squared magnitude outside the category subspace.
    ///
    /// Terms unknown to the model count entirely as residual. 0.0 means the
    /// query lies in the subspace, 1.0 means it is orthogonal to it. A query
    /// without weight scores 1.0.
    pub fn categorize(&self, query: &TermFrequencyVector) -> f64 {
        // the ratio does not depend on scale, the unit vector keeps the squares finite
        let query = query.unit_vector();
        let total = query.norm_sq();
        if total <= 0.0 {
            return 1.0;
        }
        let mut restricted = vec![0.0; self.dictionary.len()];
        let mut unknown = 0.0;
        for (term, weight) in query.iter() {
            match self.dictionary.get_index_of(term) {
                Some(row) => restricted[row] = weight,
                None => unknown += weight * weight,
            }
        }
        let outside = norm_sq(&residual(&self.basis, &restricted)) + unknown;
        (outside / total).min(1.0)
    }

    /// `categorize` over many queries in parallel, results in input order
    pub fn categorize_batch(&self, queries: &[TermFrequencyVector]) -> Vec<f64> {
        queries.par_iter().map(|q| self.categorize(q)).collect()
    }

    pub fn dictionary(&self) -> &IndexSet<Box<str>> {
        &self.dictionary
    }

    /// Row of `term` in the term-by-example matrix
    pub fn term_row(&self, term: &str) -> Option<usize> {
        self.dictionary.get_index_of(term)
    }

    /// Raw term-by-example weights, one column per example
    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.matrix
    }

    pub fn num_examples(&self) -> usize {
        self.matrix.len()
    }

    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Orthonormal term-space basis columns
    pub fn basis(&self) -> &[Vec<f64>] {
        &self.basis
    }

    pub fn rank(&self) -> usize {
        self.basis.len()
    }

    /// Frobenius norm of what the basis fails to reconstruct of the examples
    pub fn model_score(&self) -> f64 {
        self.model_score
    }

    pub fn weighting(&self) -> ExampleWeighting {
        self.weighting
    }
}

fn scaled_columns(matrix: &[Vec<f64>], weighting: ExampleWeighting) -> Vec<Vec<f64>> {
    match weighting {
        ExampleWeighting::Raw => matrix.to_vec(),
        ExampleWeighting::UnitLength => matrix
            .iter()
            .map(|column| {
                let mut column = column.clone();
                normalize(&mut column);
                column
            })
            .collect(),
    }
}
