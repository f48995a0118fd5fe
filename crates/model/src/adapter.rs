//! ML scoring adapter
//!
//! Encodes normalized product attributes against the trained vocabularies,
//! invokes the classifier, and decodes the result to an eco grade. The
//! endpoint must always produce a grade, so the adapter boundary catches
//! every error kind, logs it, and returns the default grade "C" with 0%
//! confidence.

use crate::forest::RandomForest;
use crate::vocab::{
    EncoderSet, DEFAULT_MATERIAL, DEFAULT_ORIGIN, DEFAULT_RECYCLABILITY, DEFAULT_TRANSPORT,
};
use crate::{ModelError, Result};
use ecotrace_core::EcoGrade;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Input feature names, in classifier column order
pub const FEATURE_NAMES: [&str; 5] = ["material", "weight", "transport", "recyclability", "origin"];

/// Grade substituted when prediction or decoding fails
const FALLBACK_GRADE: EcoGrade = EcoGrade::C;

/// A pre-fitted classifier and its vocabularies, loaded once at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub forest: RandomForest,
    pub encoders: EncoderSet,
}

impl ModelBundle {
    /// Load and validate a bundle from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let start = std::time::Instant::now();
        let raw = std::fs::read_to_string(path.as_ref())?;
        let bundle: ModelBundle = serde_json::from_str(&raw)?;
        bundle.validate()?;
        tracing::info!(
            path = %path.as_ref().display(),
            trees = bundle.forest.trees.len(),
            classes = bundle.forest.n_classes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "model bundle loaded"
        );
        Ok(bundle)
    }

    pub fn validate(&self) -> Result<()> {
        self.encoders.validate()?;
        if self.forest.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }
        if self.forest.n_classes != self.encoders.grade.len() {
            return Err(ModelError::BundleInvalid(format!(
                "forest has {} classes but grade vocabulary has {}",
                self.forest.n_classes,
                self.encoders.grade.len()
            )));
        }
        if self.forest.feature_importances.len() != FEATURE_NAMES.len() {
            return Err(ModelError::BundleInvalid(format!(
                "expected {} feature importances, got {}",
                FEATURE_NAMES.len(),
                self.forest.feature_importances.len()
            )));
        }
        Ok(())
    }
}

/// Normalized attributes ready for encoding
#[derive(Debug, Clone)]
pub struct AdapterInput {
    pub material: String,
    pub weight_kg: f64,
    pub transport: String,
    pub recyclability: String,
    pub origin: String,
}

/// Attributes encoded against the trained vocabularies.
///
/// Created fresh per request and never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct EncodedFeatureVector {
    pub material: usize,
    pub weight: f64,
    pub transport: usize,
    pub recyclability: usize,
    pub origin: usize,
}

impl EncodedFeatureVector {
    pub fn as_features(&self) -> [f64; 5] {
        [
            self.material as f64,
            self.weight,
            self.transport as f64,
            self.recyclability as f64,
            self.origin as f64,
        ]
    }
}

/// Per-request feature impact: encoded value scaled by global importance
#[derive(Debug, Clone, Serialize)]
pub struct FeatureImpact {
    pub material: f64,
    pub weight: f64,
    pub transport: f64,
    pub recyclability: f64,
    pub origin: f64,
}

/// Grade and confidence only — the degraded-safe shape
#[derive(Debug, Clone, Serialize)]
pub struct GradePrediction {
    pub grade: EcoGrade,
    pub confidence_pct: f64,
}

/// Full prediction detail for the `/predict` endpoint
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub grade: EcoGrade,
    pub confidence_pct: f64,
    pub encoded: EncodedFeatureVector,
    pub feature_impact: FeatureImpact,
}

/// The scoring adapter: read-only after construction, safe to share across
/// requests.
#[derive(Debug, Clone)]
pub struct ScoringAdapter {
    bundle: ModelBundle,
}

impl ScoringAdapter {
    pub fn new(bundle: ModelBundle) -> Self {
        Self { bundle }
    }

    /// Global feature importances as (name, importance) pairs.
    pub fn feature_importances(&self) -> Vec<(&'static str, f64)> {
        FEATURE_NAMES
            .iter()
            .zip(&self.bundle.forest.feature_importances)
            .map(|(name, importance)| (*name, *importance))
            .collect()
    }

    /// Grade labels in classifier class order.
    pub fn grade_classes(&self) -> &[String] {
        &self.bundle.encoders.grade.classes
    }

    /// Check that every categorical attribute and the grade label sit inside
    /// the trained vocabularies, with no default substitution needed.
    ///
    /// Used to gate the clean training log: only fully in-vocabulary rows are
    /// worth retraining on.
    pub fn covers(&self, input: &AdapterInput, grade: EcoGrade) -> bool {
        let encoders = &self.bundle.encoders;
        encoders.material.contains(&input.material)
            && encoders.transport.contains(&input.transport)
            && encoders.recyclability.contains(&input.recyclability)
            && encoders.origin.contains(&input.origin)
            && encoders.grade.contains(grade.as_str())
    }

    /// Encode normalized attributes, substituting per-field defaults for
    /// out-of-vocabulary values.
    pub fn encode(&self, input: &AdapterInput) -> Result<EncodedFeatureVector> {
        let encoders = &self.bundle.encoders;
        Ok(EncodedFeatureVector {
            material: encoders.material.safe_encode(&input.material, DEFAULT_MATERIAL)?,
            weight: input.weight_kg,
            transport: encoders.transport.safe_encode(&input.transport, DEFAULT_TRANSPORT)?,
            recyclability: encoders
                .recyclability
                .safe_encode(&input.recyclability, DEFAULT_RECYCLABILITY)?,
            origin: encoders.origin.safe_encode(&input.origin, DEFAULT_ORIGIN)?,
        })
    }

    /// Full prediction with encoded input and per-feature impact.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`ModelError`] so callers can inspect the
    /// failure kind. Use [`Self::predict`] for the degraded-safe contract.
    pub fn predict_detailed(&self, input: &AdapterInput) -> Result<Prediction> {
        let encoded = self.encode(input)?;
        let features = encoded.as_features();

        let class = self.bundle.forest.predict(&features)?;
        let grade = self
            .bundle
            .encoders
            .grade
            .decode(class)
            .and_then(EcoGrade::parse)
            // A decoded label outside the canonical seven-grade set
            .unwrap_or(FALLBACK_GRADE);

        let proba = self.bundle.forest.predict_proba(&features)?;
        let max_proba = proba.into_iter().fold(0.0f64, f64::max);
        // Max class probability as a percentage, one decimal place
        let confidence_pct = (max_proba * 1000.0).round() / 10.0;

        let importances = &self.bundle.forest.feature_importances;
        let feature_impact = FeatureImpact {
            material: features[0] * importances[0],
            weight: features[1] * importances[1],
            transport: features[2] * importances[2],
            recyclability: features[3] * importances[3],
            origin: features[4] * importances[4],
        };

        Ok(Prediction {
            grade,
            confidence_pct,
            encoded,
            feature_impact,
        })
    }

    /// Predict a grade, never failing.
    ///
    /// Any encoding or prediction error is logged and degrades to grade "C"
    /// with 0% confidence.
    pub fn predict(&self, input: &AdapterInput) -> GradePrediction {
        match self.predict_detailed(input) {
            Ok(prediction) => GradePrediction {
                grade: prediction.grade,
                confidence_pct: prediction.confidence_pct,
            },
            Err(err) => {
                tracing::warn!(error = %err, "prediction failed, returning default grade");
                GradePrediction {
                    grade: FALLBACK_GRADE,
                    confidence_pct: 0.0,
                }
            }
        }
    }
}
