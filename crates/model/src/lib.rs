//! # EcoTrace Model
//!
//! ML scoring adapter for the EcoTrace service.
//!
//! Wraps a pre-fitted random forest classifier (trained offline, serialized
//! as JSON) together with the label vocabularies learned at training time.
//! The adapter encodes normalized product attributes against those
//! vocabularies, invokes the classifier, and decodes the predicted class back
//! to an eco grade — degrading to a safe default instead of failing.
//!
//! ## Modules
//!
//! - `adapter`: Feature encoding and never-fail grade prediction
//! - `forest`: Random forest deserialization and inference
//! - `vocab`: Label vocabularies with bidirectional encode/decode

pub mod adapter;
pub mod forest;
pub mod vocab;

pub use adapter::{
    AdapterInput, EncodedFeatureVector, FeatureImpact, GradePrediction, ModelBundle, Prediction,
    ScoringAdapter, FEATURE_NAMES,
};
pub use forest::{DecisionTree, RandomForest, TreeNode};
pub use vocab::{
    EncoderSet, LabelVocabulary, DEFAULT_MATERIAL, DEFAULT_ORIGIN, DEFAULT_RECYCLABILITY,
    DEFAULT_TRANSPORT,
};

use thiserror::Error;

/// Errors produced while loading the model bundle or running inference.
///
/// None of these reach HTTP callers of the estimate pipeline: the adapter
/// boundary matches on the kind, logs it, and substitutes the default grade.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model bundle: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to deserialize model bundle: {0}")]
    Deserialize(#[from] serde_json::Error),

    #[error("Model bundle invalid: {0}")]
    BundleInvalid(String),

    #[error("Vocabulary '{vocabulary}' is missing its default class '{default}'")]
    MissingDefault {
        vocabulary: String,
        default: String,
    },

    #[error("Feature index {feature} out of range for tree node")]
    FeatureOutOfRange { feature: usize },

    #[error("Malformed decision tree: {0}")]
    MalformedTree(String),

    #[error("Forest has no trees")]
    EmptyForest,
}

/// Result type alias for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
