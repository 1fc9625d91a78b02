use std::path::{Path, PathBuf};

use pearlyx::FEATURE_NAMES;
use serde_json::{Value, json};

fn names() -> Vec<&'static str> {
    FEATURE_NAMES.to_vec()
}

/// Logistic model whose only weight sits on local jitter (percent scale).
pub fn logistic_model(jitter_weight: f64, bias: f64) -> Value {
    let mut weights = vec![0.0; FEATURE_NAMES.len()];
    weights[4] = jitter_weight;
    json!({
        "kind": "logistic",
        "model_version": 3,
        "feature_names": names(),
        "weights": weights,
        "bias": bias,
    })
}

/// Single-stump ensemble: jitter below `threshold` pulls the probability down.
pub fn stump_ensemble(threshold: f64) -> Value {
    json!({
        "kind": "tree_ensemble",
        "model_version": 1,
        "feature_names": names(),
        "base_score": 0.5,
        "trees": [{
            "nodes": [
                { "type": "split", "feature_index": 4, "threshold": threshold, "left": 1, "right": 2 },
                { "type": "leaf", "value": -2.0 },
                { "type": "leaf", "value": 2.0 }
            ]
        }]
    })
}

pub fn scaler(mean: f64, scale: f64) -> Value {
    json!({
        "feature_names": names(),
        "mean": vec![mean; FEATURE_NAMES.len()],
        "scale": vec![scale; FEATURE_NAMES.len()],
    })
}

pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, serde_json::to_vec_pretty(value).expect("serialize fixture"))
        .expect("write fixture");
    path
}
