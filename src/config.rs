//! Defaults and runtime configuration for candidate-set reduction.
//!
//! The constants are the values used when a caller leaves an option unset.
//! `ReductionConfig` is the runtime surface; it deserializes from any serde
//! format using the camelCase option names (`threshold`, `termsToUse`,
//! `maxCandidateSetSize`).

use serde::{Deserialize, Serialize};

use crate::error::{Result, SenseError};

/// Maximum number of documents a single accepted conjunction may match.
pub const DEFAULT_THRESHOLD: u64 = 500;

/// Maximum size of the materialized candidate set.
pub const DEFAULT_MAX_CANDIDATE_SET_SIZE: usize = 5000;

/// Share of the query vector's terms used as pivots when `termsToUse` is unset.
pub const AUTO_TERMS_RATIO: f64 = 0.2;

/// Lower bound of the automatic pivot count.
pub const MIN_AUTO_TERMS: usize = 5;

/// Number of top hits turned into category prototypes.
pub const DEFAULT_PROTOTYPE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReductionConfig {
    /// max documents per accepted conjunction
    pub threshold: u64,
    /// pivot-set size, `None` means automatic
    pub terms_to_use: Option<usize>,
    pub max_candidate_set_size: usize,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            terms_to_use: None,
            max_candidate_set_size: DEFAULT_MAX_CANDIDATE_SET_SIZE,
        }
    }
}

impl ReductionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: u64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_terms_to_use(mut self, terms: usize) -> Self {
        self.terms_to_use = Some(terms);
        self
    }

    pub fn with_max_candidate_set_size(mut self, size: usize) -> Self {
        self.max_candidate_set_size = size;
        self
    }

    /// Reject values the reduction cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.threshold == 0 {
            return Err(SenseError::invalid("threshold must be at least 1"));
        }
        if self.terms_to_use == Some(0) {
            return Err(SenseError::invalid("termsToUse must be at least 1"));
        }
        if self.max_candidate_set_size == 0 {
            return Err(SenseError::invalid("maxCandidateSetSize must be at least 1"));
        }
        Ok(())
    }

    /// Pivot count for a vector with `size` terms.
    ///
    /// Automatic mode takes `max(round(size * 0.2), 5)`; both modes are clamped
    /// to `size`.
    pub fn pivot_count(&self, size: usize) -> usize {
        let wanted = match self.terms_to_use {
            Some(n) => n,
            None => ((size as f64 * AUTO_TERMS_RATIO).round() as usize).max(MIN_AUTO_TERMS),
        };
        wanted.min(size)
    }
}
