//! Turns a classifier probability into the structured, interpretable result.
//!
//! Every function here is pure; the only inputs are the probability, the
//! decision threshold and the feature vector the probability came from.

use serde::{Deserialize, Serialize};

use crate::analysis::FeatureVector;
use crate::error::ScoringError;

/// Decision threshold used when the caller supplies none.
pub const DEFAULT_THRESHOLD: f64 = 0.52;

/// Fixed reference probability for the voice-quality score.
///
/// Independent of the caller's threshold.
pub const VOICE_QUALITY_REFERENCE: f64 = 0.52;

pub const POSITIVE_DIAGNOSIS: &str = "Parkinson's detected";
pub const NEGATIVE_DIAGNOSIS: &str = "No Parkinson's detected";

/// How far the probability sits into the positive range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    High,
    Moderate,
    Low,
}

impl Severity {
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.75 {
            Self::High
        } else if probability > 0.6 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

/// Confidence tier; the band around the reference probability is checked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    pub fn from_probability(probability: f64) -> Self {
        if (probability - VOICE_QUALITY_REFERENCE).abs() < 0.1 {
            Self::Medium
        } else if probability > 0.7 {
            Self::High
        } else {
            Self::Low
        }
    }
}

/// Sub-scores read from individual measurements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetrics {
    /// Local relative jitter, in percent.
    pub voice_tremor: f64,
    /// One minus local relative shimmer, in percent.
    pub voice_stability: f64,
    /// Noise-to-harmonics ratio, in percent.
    ///
    /// Grows as breathiness gets worse, despite the name; kept for
    /// compatibility with existing consumers of this field.
    pub breath_support: f64,
}

impl AnalysisMetrics {
    pub fn from_features(features: &FeatureVector) -> Self {
        Self {
            voice_tremor: round2(features.loc_pct_jitter * 100.0),
            voice_stability: round2((1.0 - features.loc_shimmer) * 100.0),
            breath_support: round2(features.mean_noise_to_harm_harmonicity * 100.0),
        }
    }
}

/// Outcome of one analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// `1` when the probability exceeds the threshold, else `0`.
    pub prediction: u8,
    pub probability: f64,
    pub confidence: Confidence,
    pub severity: Severity,
    /// `0..=100`.
    pub voice_quality: f64,
    /// `0..=100`.
    pub reliability: f64,
    pub diagnosis: String,
    pub analysis_metrics: AnalysisMetrics,
}

/// Derive the full result from a classifier probability.
pub fn score(
    probability: f64,
    threshold: f64,
    features: &FeatureVector,
) -> Result<ClassificationResult, ScoringError> {
    if !(0.0..=1.0).contains(&probability) {
        return Err(ScoringError::ProbabilityOutOfRange(probability));
    }
    validate_threshold(threshold)?;
    let prediction = u8::from(probability > threshold);
    Ok(ClassificationResult {
        prediction,
        probability,
        confidence: Confidence::from_probability(probability),
        severity: Severity::from_probability(probability),
        voice_quality: percent_closeness(probability, VOICE_QUALITY_REFERENCE),
        reliability: percent_closeness(probability, threshold),
        diagnosis: if prediction == 1 {
            POSITIVE_DIAGNOSIS
        } else {
            NEGATIVE_DIAGNOSIS
        }
        .to_string(),
        analysis_metrics: AnalysisMetrics::from_features(features),
    })
}

/// Reject thresholds outside `[0, 1]` (NaN included).
pub fn validate_threshold(threshold: f64) -> Result<(), ScoringError> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(())
    } else {
        Err(ScoringError::InvalidThreshold(threshold))
    }
}

fn percent_closeness(probability: f64, reference: f64) -> f64 {
    ((1.0 - (probability - reference).abs()) * 100.0).clamp(0.0, 100.0)
}

/// Round to two decimals, halves away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FEATURE_COUNT;

    fn features() -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        values[4] = 0.012_345;
        values[9] = 0.0456;
        values[16] = 0.031_17;
        FeatureVector::from_slice(&values).unwrap()
    }

    #[test]
    fn prediction_is_strictly_above_threshold() {
        let f = features();
        assert_eq!(score(0.52, 0.52, &f).unwrap().prediction, 0);
        assert_eq!(score(0.5200001, 0.52, &f).unwrap().prediction, 1);
        assert_eq!(score(0.9, 0.95, &f).unwrap().prediction, 0);
    }

    #[test]
    fn raising_threshold_never_turns_negative_into_positive() {
        let f = features();
        for p in [0.0, 0.3, 0.52, 0.61, 0.9, 1.0] {
            let mut last = 1;
            for t in [0.0, 0.25, 0.5, 0.52, 0.75, 1.0] {
                let prediction = score(p, t, &f).unwrap().prediction;
                assert!(prediction <= last, "p={p} t={t}");
                last = prediction;
            }
        }
    }

    #[test]
    fn severity_boundaries_are_exclusive() {
        assert_eq!(Severity::from_probability(0.6), Severity::Low);
        assert_eq!(Severity::from_probability(0.6000001), Severity::Moderate);
        assert_eq!(Severity::from_probability(0.75), Severity::Moderate);
        assert_eq!(Severity::from_probability(0.7500001), Severity::High);
    }

    #[test]
    fn confidence_tiers() {
        assert_eq!(Confidence::from_probability(0.50), Confidence::Medium);
        assert_eq!(Confidence::from_probability(0.85), Confidence::High);
        assert_eq!(Confidence::from_probability(0.30), Confidence::Low);
        assert_eq!(Confidence::from_probability(0.65), Confidence::Low);
    }

    #[test]
    fn voice_quality_ignores_threshold_but_reliability_tracks_it() {
        let f = features();
        let a = score(0.62, 0.52, &f).unwrap();
        let b = score(0.62, 0.3, &f).unwrap();
        assert!((a.voice_quality - 90.0).abs() < 1e-9);
        assert_eq!(a.voice_quality, b.voice_quality);
        assert!((a.reliability - 90.0).abs() < 1e-9);
        assert!((b.reliability - 68.0).abs() < 1e-9);
    }

    #[test]
    fn scores_stay_within_percent_range() {
        let f = features();
        for i in 0..=100 {
            let p = i as f64 / 100.0;
            let result = score(p, 0.0, &f).unwrap();
            assert!((0.0..=100.0).contains(&result.voice_quality));
            assert!((0.0..=100.0).contains(&result.reliability));
        }
    }

    #[test]
    fn metrics_read_named_measurements() {
        let metrics = AnalysisMetrics::from_features(&features());
        assert_eq!(metrics.voice_tremor, 1.23);
        assert_eq!(metrics.voice_stability, 95.44);
    }

    /// Known quirk, reproduced on purpose: breath support is the
    /// noise-to-harmonics ratio, so a noisier voice scores higher.
    #[test]
    fn breath_support_follows_noise_to_harmonics_ratio() {
        let mut clean = features();
        clean.mean_noise_to_harm_harmonicity = 0.01;
        let mut breathy = clean;
        breathy.mean_noise_to_harm_harmonicity = 0.2;
        assert_eq!(AnalysisMetrics::from_features(&clean).breath_support, 1.0);
        assert_eq!(AnalysisMetrics::from_features(&breathy).breath_support, 20.0);
        assert_eq!(AnalysisMetrics::from_features(&features()).breath_support, 3.12);
    }

    #[test]
    fn diagnosis_text_follows_prediction() {
        let f = features();
        assert_eq!(score(0.9, 0.52, &f).unwrap().diagnosis, "Parkinson's detected");
        assert_eq!(score(0.1, 0.52, &f).unwrap().diagnosis, "No Parkinson's detected");
    }

    #[test]
    fn out_of_range_inputs_are_rejected() {
        let f = features();
        assert_eq!(
            score(1.2, 0.52, &f),
            Err(ScoringError::ProbabilityOutOfRange(1.2))
        );
        assert!(matches!(
            score(f64::NAN, 0.52, &f),
            Err(ScoringError::ProbabilityOutOfRange(_))
        ));
        assert_eq!(score(0.5, -0.1, &f), Err(ScoringError::InvalidThreshold(-0.1)));
    }

    #[test]
    fn round2_rounds_halves_away_from_zero() {
        assert_eq!(round2(1.005_000_1), 1.01);
        assert_eq!(round2(-2.345_000_1), -2.35);
        assert_eq!(round2(0.125), 0.13);
    }

    #[test]
    fn result_serializes_tiers_as_words() {
        let json = serde_json::to_value(score(0.8, 0.52, &features()).unwrap()).unwrap();
        assert_eq!(json["severity"], "High");
        assert_eq!(json["confidence"], "High");
        assert_eq!(json["prediction"], 1);
        assert_eq!(json["analysis_metrics"]["voice_tremor"], 1.23);
    }
}
