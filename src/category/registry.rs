use std::sync::Arc;

use ahash::RandomState;
use dashmap::DashMap;
use tracing::info;

use crate::{
    category::{ExampleWeighting, LatentCategoryModel},
    error::Result,
    vectorizer::TermFrequencyVector,
};

/// Named category models shared between threads.
///
/// A model is always built completely before it is published, and publishing
/// swaps one `Arc`, so readers see either the old model or the new one. When
/// two threads rebuild the same name, the last insert wins.
#[derive(Debug, Default)]
pub struct CategoryRegistry {
    models: DashMap<Box<str>, Arc<LatentCategoryModel>, RandomState>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self {
            models: DashMap::with_hasher(RandomState::new()),
        }
    }

    /// Build a model from `examples` and publish it under `name`
    /// On error the previously published model stays in place.
    pub fn rebuild(&self, name: &str, examples: &[TermFrequencyVector]) -> Result<Arc<LatentCategoryModel>> {
        self.rebuild_with(name, examples, ExampleWeighting::default())
    }

    pub fn rebuild_with(
        &self,
        name: &str,
        examples: &[TermFrequencyVector],
        weighting: ExampleWeighting,
    ) -> Result<Arc<LatentCategoryModel>> {
        let model = Arc::new(LatentCategoryModel::build_with(examples, weighting)?);
        self.publish(name, Arc::clone(&model));
        Ok(model)
    }

    /// Publish an already built model
    pub fn publish(&self, name: &str, model: Arc<LatentCategoryModel>) {
        let replaced = self.models.insert(Box::from(name), model).is_some();
        info!(category = name, replaced, "category published");
    }

    pub fn get(&self, name: &str) -> Option<Arc<LatentCategoryModel>> {
        self.models.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<LatentCategoryModel>> {
        self.models.remove(name).map(|(_, model)| model)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
