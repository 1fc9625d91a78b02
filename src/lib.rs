//! Acoustic voice-biomarker extraction and screening classification.
//!
//! A decoded mono recording flows through [`analysis`] into a 29-measure
//! [`FeatureVector`], then through a loaded classifier ([`ml`]) and the
//! interpretive [`scoring`] rules. [`VoiceAnalyzer`] ties the stages together.

/// Application directory resolution.
pub mod app_dirs;
/// Decoded audio and file decoding.
pub mod audio;
/// Feature extraction.
pub mod analysis;
/// TOML settings.
pub mod config;
/// Error taxonomy shared by every stage.
pub mod error;
/// Tracing setup for the binaries.
pub mod logging;
/// Classifier and scaler artifacts.
pub mod ml;
/// Probability-to-result scoring.
pub mod scoring;
/// The analyzer service object.
pub mod service;

pub use analysis::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector, extract_features};
pub use audio::AudioSignal;
pub use error::{AnalysisError, ClassificationError, ModelError, PipelineError, ScoringError};
pub use scoring::{ClassificationResult, DEFAULT_THRESHOLD};
pub use service::{SharedAnalyzer, VoiceAnalyzer};
