use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::ProbabilityModel;
use super::gbdt::TreeEnsembleModel;
use super::logreg::LogisticModel;
use super::scaler::StandardScaler;
use crate::error::ModelError;

/// A serialized classifier, tagged by `"kind"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    TreeEnsemble(TreeEnsembleModel),
    Logistic(LogisticModel),
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::TreeEnsemble(model) => model.validate(),
            Self::Logistic(model) => model.validate(),
        }
    }

    pub fn model_version(&self) -> i64 {
        match self {
            Self::TreeEnsemble(model) => model.model_version,
            Self::Logistic(model) => model.model_version,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::TreeEnsemble(_) => "tree_ensemble",
            Self::Logistic(_) => "logistic",
        }
    }
}

impl ProbabilityModel for ModelArtifact {
    fn feature_names(&self) -> &[String] {
        match self {
            Self::TreeEnsemble(model) => model.feature_names(),
            Self::Logistic(model) => model.feature_names(),
        }
    }

    fn predict_probability(&self, features: &[f64]) -> f64 {
        match self {
            Self::TreeEnsemble(model) => model.predict_probability(features),
            Self::Logistic(model) => model.predict_probability(features),
        }
    }
}

/// Load and validate a classifier artifact from a JSON file.
pub fn load_model(path: &Path) -> Result<ModelArtifact, ModelError> {
    let model: ModelArtifact = read_json(path)?;
    model.validate().map_err(ModelError::Invalid)?;
    info!(
        "Loaded {} model v{} from {}",
        model.kind(),
        model.model_version(),
        path.display()
    );
    Ok(model)
}

/// Load and validate a feature scaler from a JSON file.
pub fn load_scaler(path: &Path) -> Result<StandardScaler, ModelError> {
    let scaler: StandardScaler = read_json(path)?;
    scaler.validate().map_err(ModelError::Invalid)?;
    info!("Loaded feature scaler from {}", path.display());
    Ok(scaler)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let bytes = std::fs::read(path).map_err(|source| ModelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ModelError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{FEATURE_COUNT, FEATURE_NAMES};
    use tempfile::tempdir;

    fn logistic_json() -> serde_json::Value {
        serde_json::json!({
            "kind": "logistic",
            "model_version": 3,
            "feature_names": FEATURE_NAMES,
            "weights": vec![0.0; FEATURE_COUNT],
            "bias": 0.0,
        })
    }

    #[test]
    fn loads_tagged_logistic_model() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, logistic_json().to_string()).unwrap();
        let model = load_model(&path).unwrap();
        assert!(matches!(model, ModelArtifact::Logistic(_)));
        assert_eq!(model.model_version(), 3);
        assert_eq!(model.predict_probability(&[0.0; FEATURE_COUNT]), 0.5);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = load_model(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ModelError::Read { .. }));
    }

    #[test]
    fn corrupt_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "{\"kind\": \"forest\"}").unwrap();
        assert!(matches!(load_model(&path), Err(ModelError::Parse { .. })));
    }

    #[test]
    fn structurally_invalid_model_is_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("model.json");
        let mut json = logistic_json();
        json["weights"] = serde_json::json!([1.0, 2.0]);
        std::fs::write(&path, json.to_string()).unwrap();
        assert!(matches!(load_model(&path), Err(ModelError::Invalid(_))));
    }
}
