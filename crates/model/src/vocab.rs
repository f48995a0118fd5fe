//! Label vocabularies learned at training time
//!
//! Each categorical feature has a fixed ordered class list; encoding maps a
//! label to its position and decoding maps a position back. Values outside a
//! vocabulary are substituted with the field's documented default before
//! encoding, with a diagnostic — never a failure.

use crate::ModelError;
use serde::{Deserialize, Serialize};

/// Default class substituted for out-of-vocabulary materials
pub const DEFAULT_MATERIAL: &str = "Other";
/// Default class substituted for out-of-vocabulary transport modes
pub const DEFAULT_TRANSPORT: &str = "Land";
/// Default class substituted for out-of-vocabulary recyclability labels
pub const DEFAULT_RECYCLABILITY: &str = "Medium";
/// Default class substituted for out-of-vocabulary origins
pub const DEFAULT_ORIGIN: &str = "Other";

/// A fixed ordered class list with bidirectional encode/decode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelVocabulary {
    pub name: String,
    pub classes: Vec<String>,
}

impl LabelVocabulary {
    pub fn new(name: impl Into<String>, classes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            classes,
        }
    }

    /// Encode a label to its class index.
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }

    /// Decode a class index back to its label.
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.classes.iter().any(|c| c == label)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Encode a label, substituting `default` when the label is absent.
    ///
    /// A substitution emits a warn-level diagnostic. Fails only if the
    /// default itself is missing from the vocabulary, which indicates a
    /// corrupt bundle.
    pub fn safe_encode(&self, label: &str, default: &str) -> Result<usize, ModelError> {
        if let Some(index) = self.encode(label) {
            return Ok(index);
        }
        tracing::warn!(
            vocabulary = %self.name,
            value = %label,
            default = %default,
            "value not in vocabulary, substituting default"
        );
        self.encode(default).ok_or_else(|| ModelError::MissingDefault {
            vocabulary: self.name.clone(),
            default: default.to_string(),
        })
    }
}

/// The five vocabularies the classifier was fitted with
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncoderSet {
    pub material: LabelVocabulary,
    pub transport: LabelVocabulary,
    pub recyclability: LabelVocabulary,
    pub origin: LabelVocabulary,
    /// Target grade labels, in classifier class order
    pub grade: LabelVocabulary,
}

impl EncoderSet {
    /// Check that every vocabulary is non-empty and contains its default.
    pub fn validate(&self) -> Result<(), ModelError> {
        for (vocab, default) in [
            (&self.material, DEFAULT_MATERIAL),
            (&self.transport, DEFAULT_TRANSPORT),
            (&self.recyclability, DEFAULT_RECYCLABILITY),
            (&self.origin, DEFAULT_ORIGIN),
        ] {
            if vocab.is_empty() {
                return Err(ModelError::BundleInvalid(format!(
                    "vocabulary '{}' is empty",
                    vocab.name
                )));
            }
            if !vocab.contains(default) {
                return Err(ModelError::MissingDefault {
                    vocabulary: vocab.name.clone(),
                    default: default.to_string(),
                });
            }
        }
        if self.grade.is_empty() {
            return Err(ModelError::BundleInvalid(
                "grade vocabulary is empty".to_string(),
            ));
        }
        Ok(())
    }
}
