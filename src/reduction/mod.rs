//! Bounded-fanout filter construction.
//!
//! Turns a weighted query vector into a disjunction of term conjunctions whose
//! clauses each match at most a configured number of documents, used to cut a
//! large collection down to a candidate set before expensive scoring.

pub mod builder;
pub mod cache;
pub mod filter;
pub mod index_set;

pub use builder::AdaptiveFilterBuilder;
pub use cache::CardinalityCache;
pub use filter::{BooleanFilter, BuildStats, Conjunction};
pub use index_set::TermIndexSet;
