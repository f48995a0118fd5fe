//! Random forest inference
//!
//! Deserializes a forest trained offline and exported as JSON: each tree is a
//! flat node array with split nodes (feature index, threshold, child
//! indices) and leaf nodes (per-class sample counts). Prediction averages the
//! normalized leaf distributions across trees.

use crate::ModelError;
use serde::{Deserialize, Serialize};

/// A node in a flattened decision tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        class_counts: Vec<f64>,
    },
}

/// A single decision tree, nodes indexed from the root at 0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Walk the tree and return the normalized class distribution at the
    /// reached leaf.
    pub fn class_distribution(
        &self,
        features: &[f64],
        n_classes: usize,
    ) -> Result<Vec<f64>, ModelError> {
        if self.nodes.is_empty() {
            return Err(ModelError::MalformedTree("tree has no nodes".to_string()));
        }

        let mut index = 0usize;
        // A well-formed tree terminates within nodes.len() steps; the bound
        // guards against cyclic child indices in a corrupt bundle.
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(index) {
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let value = features
                        .get(*feature)
                        .copied()
                        .ok_or(ModelError::FeatureOutOfRange { feature: *feature })?;
                    index = if value <= *threshold { *left } else { *right };
                }
                Some(TreeNode::Leaf { class_counts }) => {
                    if class_counts.len() != n_classes {
                        return Err(ModelError::MalformedTree(format!(
                            "leaf has {} classes, forest expects {}",
                            class_counts.len(),
                            n_classes
                        )));
                    }
                    let total: f64 = class_counts.iter().sum();
                    if total <= 0.0 {
                        return Err(ModelError::MalformedTree(
                            "leaf has no samples".to_string(),
                        ));
                    }
                    return Ok(class_counts.iter().map(|c| c / total).collect());
                }
                None => {
                    return Err(ModelError::MalformedTree(format!(
                        "child index {} out of bounds",
                        index
                    )))
                }
            }
        }
        Err(ModelError::MalformedTree(
            "tree traversal did not reach a leaf".to_string(),
        ))
    }
}

/// A pre-fitted random forest classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    pub n_classes: usize,
    pub trees: Vec<DecisionTree>,
    /// Global importance per input feature, summing to 1
    pub feature_importances: Vec<f64>,
}

impl RandomForest {
    /// Predict the class probability vector for a feature vector.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if self.trees.is_empty() {
            return Err(ModelError::EmptyForest);
        }

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            let distribution = tree.class_distribution(features, self.n_classes)?;
            for (acc, p) in proba.iter_mut().zip(distribution) {
                *acc += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        for p in &mut proba {
            *p /= n_trees;
        }
        Ok(proba)
    }

    /// Predict the most probable class index for a feature vector.
    pub fn predict(&self, features: &[f64]) -> Result<usize, ModelError> {
        let proba = self.predict_proba(features)?;
        let (index, _) = proba
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |(best_i, best_p), (i, &p)| {
                if p > best_p {
                    (i, p)
                } else {
                    (best_i, best_p)
                }
            });
        Ok(index)
    }
}
