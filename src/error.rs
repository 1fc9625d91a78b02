//! Error taxonomy for the extraction and classification pipeline.
//!
//! Each stage owns its error enum; [`PipelineError`] wraps them for callers that
//! run extraction and classification as a single step.

use std::path::PathBuf;

use thiserror::Error;

/// Input-side failures raised by the feature extractor.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// The signal holds no samples.
    #[error("Audio signal is empty")]
    EmptySignal,
    /// The caller supplied a zero sample rate.
    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),
    /// A sample was NaN or infinite.
    #[error("Audio signal contains a non-finite sample at index {index}")]
    NonFiniteSample {
        /// Offending sample index.
        index: usize,
    },
    /// The signal is shorter than the longest analysis window.
    #[error("Audio signal is too short: {duration:.3}s (need at least {required:.3}s)")]
    TooShort {
        /// Duration of the supplied signal in seconds.
        duration: f64,
        /// Minimum supported duration in seconds.
        required: f64,
    },
    /// Every sample is zero.
    #[error("Audio signal is silent")]
    Silent,
    /// Pitch tracking found too few glottal pulses for periodicity measures.
    #[error("Found {found} glottal pulses; at least 2 are required")]
    InsufficientPulses {
        /// Number of pulses detected.
        found: usize,
    },
    /// A measure had no valid data (e.g. no period triplets within bounds).
    #[error("Measure {measure} is undefined for this signal")]
    UndefinedMeasure {
        /// Name of the undefined feature.
        measure: &'static str,
    },
    /// A computed feature came out NaN or infinite.
    #[error("Feature {feature} is not finite")]
    NonFinite {
        /// Name of the offending feature.
        feature: &'static str,
    },
}

/// Failures while loading or validating serialized artifacts.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Failed to read an artifact file.
    #[error("Failed to read model artifact {path}: {source}")]
    Read {
        /// Artifact path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to deserialize an artifact file.
    #[error("Invalid model artifact {path}: {source}")]
    Parse {
        /// Artifact path.
        path: PathBuf,
        /// JSON error.
        source: serde_json::Error,
    },
    /// The artifact deserialized but violates a structural invariant.
    #[error("Model artifact failed validation: {0}")]
    Invalid(String),
}

/// Failures while mapping a feature vector onto the model input schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassificationError {
    /// Vector length differs from the expected schema length.
    #[error("Expected {expected} features, got {actual}")]
    FeatureCountMismatch {
        /// Schema length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// An artifact expects its features in a different order.
    #[error("Feature {index} is {actual:?} in the {artifact} but {expected:?} in the extractor")]
    FeatureOrderMismatch {
        /// Which artifact disagreed ("model" or "scaler").
        artifact: &'static str,
        /// Position of the first disagreement.
        index: usize,
        /// Name the extractor produces at this position.
        expected: String,
        /// Name the artifact declares at this position.
        actual: String,
    },
    /// A feature value fed to the model is NaN or infinite.
    #[error("Input feature {index} is not finite")]
    NonFiniteInput {
        /// Position of the offending value.
        index: usize,
    },
}

/// Failures while deriving interpretive scores.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    /// The classifier returned something outside `[0, 1]`.
    #[error("Classifier probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),
    /// The decision threshold is outside `[0, 1]`.
    #[error("Decision threshold {0} is outside [0, 1]")]
    InvalidThreshold(f64),
}

/// Umbrella error for a full extract-and-classify call.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Feature extraction failed.
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
    /// Feature vector did not fit the model schema.
    #[error(transparent)]
    Classification(#[from] ClassificationError),
    /// Derived scoring failed.
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    /// Artifacts could not be loaded.
    #[error(transparent)]
    Model(#[from] ModelError),
}
