use serde::{Deserialize, Serialize};

use crate::analysis::FEATURE_COUNT;

/// Per-feature standardization `(x - mean) / scale` fitted at training time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub feature_names: Vec<String>,
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Validate dimensions; every scale must be finite and non-zero.
    pub fn validate(&self) -> Result<(), String> {
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(format!(
                "Scaler declares {} features but {FEATURE_COUNT} are required",
                self.feature_names.len()
            ));
        }
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(format!(
                "Scaler has {} means and {} scales for {FEATURE_COUNT} features",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if let Some(idx) = self.mean.iter().position(|m| !m.is_finite()) {
            return Err(format!("Scaler mean {idx} is not finite"));
        }
        if let Some(idx) = self
            .scale
            .iter()
            .position(|s| !s.is_finite() || *s == 0.0)
        {
            return Err(format!("Scaler scale {idx} must be finite and non-zero"));
        }
        Ok(())
    }

    /// Standardize a feature vector.
    pub fn transform(&self, features: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = *features;
        for ((value, mean), scale) in out.iter_mut().zip(&self.mean).zip(&self.scale) {
            *value = (*value - mean) / scale;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FEATURE_NAMES;

    fn scaler(mean: f64, scale: f64) -> StandardScaler {
        StandardScaler {
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            mean: vec![mean; FEATURE_COUNT],
            scale: vec![scale; FEATURE_COUNT],
        }
    }

    #[test]
    fn transform_centres_and_scales() {
        let scaler = scaler(1.0, 2.0);
        scaler.validate().unwrap();
        let out = scaler.transform(&[5.0; FEATURE_COUNT]);
        assert!(out.iter().all(|&v| v == 2.0));
    }

    #[test]
    fn zero_scale_is_invalid() {
        let mut scaler = scaler(0.0, 1.0);
        scaler.scale[7] = 0.0;
        let err = scaler.validate().unwrap_err();
        assert!(err.contains("scale 7"), "{err}");
    }
}
