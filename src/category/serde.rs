use crate::{
    category::LatentCategoryModel,
    error::{Result, SenseError},
};

impl LatentCategoryModel {
    /// Encode the built model as CBOR
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    /// Decode a model written by `to_bytes`
    /// The shape of the decoded matrices is checked against the dictionary.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let model: LatentCategoryModel = serde_cbor::from_slice(bytes)?;
        let rows = model.dictionary.len();
        let consistent = model.matrix.iter().all(|c| c.len() == rows)
            && model.basis.iter().all(|c| c.len() == rows)
            && model.basis.len() <= model.singular_values.len()
            && model.model_score.is_finite();
        if !consistent {
            return Err(SenseError::Serialization("decoded category model is inconsistent".to_string()));
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TermFrequencyVector;

    #[test]
    fn cbor_bytes_restore_an_equivalent_model() {
        let examples = vec![
            TermFrequencyVector::from_pairs([("tide", 3.0), ("moon", 2.0), ("salt", 1.0)]).unwrap(),
            TermFrequencyVector::from_pairs([("tide", 1.0), ("reef", 4.0)]).unwrap(),
        ];
        let model = LatentCategoryModel::build(&examples).unwrap();
        let restored = LatentCategoryModel::from_bytes(&model.to_bytes().unwrap()).unwrap();

        assert_eq!(restored.dictionary(), model.dictionary());
        assert_eq!(restored.singular_values(), model.singular_values());
        let query = TermFrequencyVector::from_pairs([("moon", 1.0), ("reef", 1.0), ("kelp", 1.0)]).unwrap();
        assert_eq!(restored.categorize(&query), model.categorize(&query));
    }

    #[test]
    fn garbage_is_a_serialization_error() {
        let err = LatentCategoryModel::from_bytes(&[0xff, 0x00, 0x13]).unwrap_err();
        assert!(matches!(err, SenseError::Serialization(_)));
    }
}
