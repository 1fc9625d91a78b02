use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::app_dirs;
use crate::scoring::DEFAULT_THRESHOLD;

/// File name of the default model artifact inside the models directory.
pub const MODEL_FILE_NAME: &str = "model.json";

/// Top-level contents of `config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    #[serde(default)]
    pub analyzer: AnalyzerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Artifact locations and decision parameters for the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzerSettings {
    /// Classifier artifact (JSON).
    #[serde(default = "default_model_path")]
    pub model_path: PathBuf,
    /// Optional feature scaler artifact; absent means raw features go to the model.
    #[serde(default)]
    pub scaler_path: Option<PathBuf>,
    /// Probability above which a recording is flagged.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Recordings shorter than this are rejected before extraction.
    #[serde(default = "default_min_duration_seconds")]
    pub min_duration_seconds: f64,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            model_path: default_model_path(),
            scaler_path: None,
            threshold: default_threshold(),
            min_duration_seconds: default_min_duration_seconds(),
        }
    }
}

impl AnalyzerSettings {
    /// Check value ranges, returning a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!("threshold {} must lie in [0, 1]", self.threshold));
        }
        if !self.min_duration_seconds.is_finite() || self.min_duration_seconds < 0.0 {
            return Err(format!(
                "min_duration_seconds {} must be a non-negative number",
                self.min_duration_seconds
            ));
        }
        Ok(())
    }

    /// Anchor relative artifact paths at `base` (the config file's directory).
    pub(crate) fn resolve_relative_to(&mut self, base: &Path) {
        if self.model_path.is_relative() {
            self.model_path = base.join(&self.model_path);
        }
        if let Some(scaler) = self.scaler_path.as_mut().filter(|p| p.is_relative()) {
            *scaler = base.join(&*scaler);
        }
    }
}

/// Console and file log verbosity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_model_path() -> PathBuf {
    app_dirs::app_root_path()
        .unwrap_or_else(|| PathBuf::from(app_dirs::APP_DIR_NAME))
        .join("models")
        .join(MODEL_FILE_NAME)
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_min_duration_seconds() -> f64 {
    0.1
}

fn default_log_level() -> String {
    "info".to_string()
}
