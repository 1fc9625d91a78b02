//! Logistic regression over the acoustic feature vector.

use serde::{Deserialize, Serialize};

use crate::analysis::FEATURE_COUNT;
use crate::ml::{ProbabilityModel, sigmoid};

/// Versioned binary logistic regression model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub model_version: i64,
    pub feature_names: Vec<String>,
    pub weights: Vec<f64>,
    pub bias: f64,
}

impl LogisticModel {
    /// Validate the model dimensions and coefficients.
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(format!(
                "Model declares {} features but {FEATURE_COUNT} are required",
                self.feature_names.len()
            ));
        }
        if self.weights.len() != FEATURE_COUNT {
            return Err(format!(
                "weights length {} does not match {FEATURE_COUNT} features",
                self.weights.len()
            ));
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err("Model coefficients must be finite".to_string());
        }
        Ok(())
    }
}

impl ProbabilityModel for LogisticModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict_probability(&self, features: &[f64]) -> f64 {
        let z = self
            .weights
            .iter()
            .zip(features)
            .fold(self.bias, |acc, (w, x)| acc + w * x);
        sigmoid(z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FEATURE_NAMES;

    fn model(weights: Vec<f64>, bias: f64) -> LogisticModel {
        LogisticModel {
            model_version: 1,
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            weights,
            bias,
        }
    }

    #[test]
    fn zero_weights_predict_sigmoid_of_bias() {
        let model = model(vec![0.0; FEATURE_COUNT], 0.0);
        model.validate().unwrap();
        assert_eq!(model.predict_probability(&[1.0; FEATURE_COUNT]), 0.5);
    }

    #[test]
    fn weights_shift_probability() {
        let mut weights = vec![0.0; FEATURE_COUNT];
        weights[4] = 2.0;
        let model = model(weights, -1.0);
        let mut features = [0.0; FEATURE_COUNT];
        features[4] = 1.0;
        assert!((model.predict_probability(&features) - sigmoid(1.0)).abs() < 1e-12);
    }

    #[test]
    fn rejects_short_weight_vector() {
        let err = model(vec![0.0; 3], 0.0).validate().unwrap_err();
        assert!(err.contains("weights length 3"), "{err}");
    }
}
