use serde::{Deserialize, Serialize};

use crate::analysis::FEATURE_COUNT;
use crate::ml::{ProbabilityModel, logit, sigmoid};

/// One node of a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TreeNode {
    /// Internal node; `feature < threshold` goes left.
    Split {
        feature_index: usize,
        threshold: f64,
        left: usize,
        right: usize,
        /// Where a NaN feature value goes.
        #[serde(default)]
        missing_left: bool,
    },
    /// Terminal node contributing `value` to the logit.
    Leaf { value: f64 },
}

/// Regression tree stored as a flat node list rooted at index 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    /// Check node references; children must come after their parent.
    fn validate(&self, tree_idx: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err(format!("Tree {tree_idx} has no nodes"));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                    ..
                } => {
                    if feature_index >= FEATURE_COUNT {
                        return Err(format!(
                            "Tree {tree_idx} node {idx} splits on feature {feature_index} \
                             (only {FEATURE_COUNT} exist)"
                        ));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("Tree {tree_idx} node {idx} has a non-finite threshold"));
                    }
                    for child in [left, right] {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!(
                                "Tree {tree_idx} node {idx} has invalid child {child}"
                            ));
                        }
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("Tree {tree_idx} leaf {idx} is not finite"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Leaf value reached by `features`.
    pub fn predict(&self, features: &[f64]) -> f64 {
        let mut idx = 0;
        // A validated tree reaches a leaf in fewer steps than it has nodes.
        for _ in 0..self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return *value,
                Some(TreeNode::Split {
                    feature_index,
                    threshold,
                    left,
                    right,
                    missing_left,
                }) => {
                    let value = features.get(*feature_index).copied().unwrap_or(f64::NAN);
                    let go_left = if value.is_nan() {
                        *missing_left
                    } else {
                        value < *threshold
                    };
                    idx = if go_left { *left } else { *right };
                }
                None => break,
            }
        }
        0.0
    }
}

/// Gradient-boosted binary-logistic tree ensemble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeEnsembleModel {
    /// Model format version.
    pub model_version: i64,
    /// Input names, in order.
    pub feature_names: Vec<String>,
    /// Prior probability the boosted logits start from.
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsembleModel {
    /// Validate structural invariants of the model.
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(format!(
                "Model declares {} features but {FEATURE_COUNT} are required",
                self.feature_names.len()
            ));
        }
        if !(self.base_score > 0.0 && self.base_score < 1.0) {
            return Err(format!("base_score {} must lie in (0, 1)", self.base_score));
        }
        if self.trees.is_empty() {
            return Err("Model contains no trees".to_string());
        }
        for (tree_idx, tree) in self.trees.iter().enumerate() {
            tree.validate(tree_idx)?;
        }
        Ok(())
    }

    /// Raw logit: prior log-odds plus every tree's leaf.
    pub fn predict_raw(&self, features: &[f64]) -> f64 {
        logit(self.base_score) + self.trees.iter().map(|tree| tree.predict(features)).sum::<f64>()
    }
}

impl ProbabilityModel for TreeEnsembleModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_probability(&self, features: &[f64]) -> f64 {
        sigmoid(self.predict_raw(features))
    }
}
