//! Classifier artifacts: loading, validation and probability inference.
//!
//! Models are trained offline and exported as JSON; this module only loads
//! and evaluates them.

mod artifact;
pub mod gbdt;
pub mod logreg;
pub mod metrics;
mod scaler;

pub use artifact::{ModelArtifact, load_model, load_scaler};
pub use gbdt::{Tree, TreeEnsembleModel, TreeNode};
pub use logreg::LogisticModel;
pub use scaler::StandardScaler;

use crate::error::ClassificationError;

/// A binary classifier producing the probability of the positive class.
pub trait ProbabilityModel: Send + Sync {
    /// Input names the model was trained on, in order.
    fn feature_names(&self) -> &[String];

    /// Probability of the positive class for an input in [`Self::feature_names`] order.
    fn predict_probability(&self, features: &[f64]) -> f64;
}

/// Logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

pub(crate) fn logit(p: f64) -> f64 {
    (p / (1.0 - p)).ln()
}

/// Confirm an artifact's declared inputs match `expected` name-for-name.
pub fn check_feature_order(
    artifact: &'static str,
    declared: &[String],
    expected: &[&str],
) -> Result<(), ClassificationError> {
    if declared.len() != expected.len() {
        return Err(ClassificationError::FeatureCountMismatch {
            expected: expected.len(),
            actual: declared.len(),
        });
    }
    match declared
        .iter()
        .zip(expected)
        .position(|(declared, expected)| declared != expected)
    {
        Some(index) => Err(ClassificationError::FeatureOrderMismatch {
            artifact,
            index,
            expected: expected[index].to_string(),
            actual: declared[index].clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(-800.0) >= 0.0 && sigmoid(-800.0) < 1e-300);
        assert_eq!(sigmoid(800.0), 1.0);
        assert!((logit(sigmoid(1.3)) - 1.3).abs() < 1e-12);
    }

    #[test]
    fn swapped_names_are_reported_with_position() {
        let declared = vec!["b".to_string(), "a".to_string()];
        let err = check_feature_order("scaler", &declared, &["a", "b"]).unwrap_err();
        assert_eq!(
            err,
            ClassificationError::FeatureOrderMismatch {
                artifact: "scaler",
                index: 0,
                expected: "a".into(),
                actual: "b".into(),
            }
        );
    }
}
