//! Acoustic feature extraction (pitch, pulses, perturbation, harmonicity, intensity, formants).

mod extract;
pub(crate) mod features;
pub(crate) mod fft;
pub mod formant;
mod frames;
mod harmonicity;
mod intensity;
pub mod params;
mod perturbation;
pub mod pitch;
pub mod pulses;

pub use extract::{extract_features, extract_features_with};
pub use features::{FEATURE_COUNT, FEATURE_NAMES, FeatureVector};
pub use params::{
    ExtractionParams, FormantParams, HarmonicityParams, IntensityParams, PerturbationParams,
    PitchParams,
};
