//! The analyzer service: loaded artifacts plus the extract-and-classify call.
//!
//! Artifacts are loaded once and never mutated, so a single [`VoiceAnalyzer`]
//! can serve any number of threads. [`SharedAnalyzer`] adds a lazy,
//! once-only loader for processes that initialize from several workers.

use std::sync::{Arc, Mutex, OnceLock};

use tracing::{debug, info, warn};

use crate::analysis::{ExtractionParams, FEATURE_NAMES, FeatureVector, extract_features_with};
use crate::audio::AudioSignal;
use crate::config::AnalyzerSettings;
use crate::error::{AnalysisError, ClassificationError, PipelineError};
use crate::ml::{ProbabilityModel, StandardScaler, check_feature_order, load_model, load_scaler};
use crate::scoring::{ClassificationResult, score, validate_threshold};

/// Classifier plus optional scaler, checked against the extractor's feature order.
pub struct VoiceAnalyzer {
    model: Box<dyn ProbabilityModel>,
    scaler: Option<StandardScaler>,
    min_duration_seconds: f64,
}

impl std::fmt::Debug for VoiceAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoiceAnalyzer")
            .field("scaled", &self.scaler.is_some())
            .field("min_duration_seconds", &self.min_duration_seconds)
            .finish_non_exhaustive()
    }
}

impl VoiceAnalyzer {
    /// Pair a model with an optional scaler.
    ///
    /// Both must declare exactly [`FEATURE_NAMES`] in order; the check runs
    /// here so `classify` never has to repeat it.
    pub fn new(
        model: Box<dyn ProbabilityModel>,
        scaler: Option<StandardScaler>,
    ) -> Result<Self, ClassificationError> {
        check_feature_order("model", model.feature_names(), &FEATURE_NAMES)?;
        if let Some(scaler) = &scaler {
            check_feature_order("scaler", &scaler.feature_names, &FEATURE_NAMES)?;
        }
        Ok(Self {
            model,
            scaler,
            min_duration_seconds: 0.0,
        })
    }

    /// Reject recordings shorter than `seconds` before extraction starts.
    pub fn with_min_duration(mut self, seconds: f64) -> Self {
        self.min_duration_seconds = seconds.max(0.0);
        self
    }

    /// Load the configured artifacts from disk.
    ///
    /// No scaler path means raw features go straight to the model; a
    /// configured scaler that fails to load is an error.
    pub fn from_settings(settings: &AnalyzerSettings) -> Result<Self, PipelineError> {
        let model = load_model(&settings.model_path)?;
        let scaler = match &settings.scaler_path {
            Some(path) => Some(load_scaler(path)?),
            None => {
                warn!("No feature scaler configured; classifying raw features");
                None
            }
        };
        Ok(Self::new(Box::new(model), scaler)?.with_min_duration(settings.min_duration_seconds))
    }

    pub fn has_scaler(&self) -> bool {
        self.scaler.is_some()
    }

    /// Score an already-extracted vector.
    pub fn classify(
        &self,
        features: &FeatureVector,
        threshold: f64,
    ) -> Result<ClassificationResult, PipelineError> {
        validate_threshold(threshold)?;
        let raw = features.to_array();
        if let Some(index) = raw.iter().position(|v| !v.is_finite()) {
            return Err(ClassificationError::NonFiniteInput { index }.into());
        }
        let input = match &self.scaler {
            Some(scaler) => scaler.transform(&raw),
            None => raw,
        };
        let probability = self.model.predict_probability(&input);
        debug!("Model probability {probability:.4} at threshold {threshold}");
        Ok(score(probability, threshold, features)?)
    }

    /// Extract features with the default parameterization and classify them.
    pub fn analyze(
        &self,
        signal: &AudioSignal,
        threshold: f64,
    ) -> Result<ClassificationResult, PipelineError> {
        self.analyze_with_params(signal, threshold, &ExtractionParams::default())
            .map(|(_, result)| result)
    }

    /// Extract with custom parameters and classify, returning both the vector and the result.
    pub fn analyze_with_params(
        &self,
        signal: &AudioSignal,
        threshold: f64,
        params: &ExtractionParams,
    ) -> Result<(FeatureVector, ClassificationResult), PipelineError> {
        validate_threshold(threshold)?;
        let duration = signal.duration_seconds();
        if !signal.is_empty() && duration < self.min_duration_seconds {
            return Err(AnalysisError::TooShort {
                duration,
                required: self.min_duration_seconds,
            }
            .into());
        }
        let features = extract_features_with(signal, params)?;
        let result = self.classify(&features, threshold)?;
        info!(
            "Analyzed {:.2}s recording: probability {:.3}, prediction {}",
            duration, result.probability, result.prediction
        );
        Ok((features, result))
    }
}

/// Lazily loads one [`VoiceAnalyzer`] and hands out shared handles.
///
/// Concurrent first calls load once; a failed load is not remembered, so
/// the next call retries.
#[derive(Debug, Default)]
pub struct SharedAnalyzer {
    slot: Mutex<Option<Arc<VoiceAnalyzer>>>,
}

impl SharedAnalyzer {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Process-wide instance.
    pub fn global() -> &'static SharedAnalyzer {
        static GLOBAL: OnceLock<SharedAnalyzer> = OnceLock::new();
        GLOBAL.get_or_init(SharedAnalyzer::new)
    }

    /// Return the loaded analyzer, loading it from `settings` on first use.
    pub fn get_or_load(
        &self,
        settings: &AnalyzerSettings,
    ) -> Result<Arc<VoiceAnalyzer>, PipelineError> {
        self.get_or_try_init(|| VoiceAnalyzer::from_settings(settings))
    }

    /// Return the loaded analyzer, building it with `load` on first use.
    pub fn get_or_try_init<F>(&self, load: F) -> Result<Arc<VoiceAnalyzer>, PipelineError>
    where
        F: FnOnce() -> Result<VoiceAnalyzer, PipelineError>,
    {
        let mut guard = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(analyzer) = guard.as_ref() {
            return Ok(Arc::clone(analyzer));
        }
        let analyzer = Arc::new(load()?);
        *guard = Some(Arc::clone(&analyzer));
        Ok(analyzer)
    }

    pub fn is_loaded(&self) -> bool {
        self.slot
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}
