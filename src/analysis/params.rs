//! Parameter sets for each stage of the extraction pipeline.
//!
//! Defaults reproduce the reference parameterization so that vectors stay
//! comparable with the data the classifier was trained on.

use serde::{Deserialize, Serialize};

/// Autocorrelation pitch tracking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchParams {
    /// Lowest pitch considered, in Hz. Also sets the analysis window.
    pub floor_hz: f64,
    /// Highest pitch considered, in Hz.
    pub ceiling_hz: f64,
    /// Frame step in seconds; `0.0` means `0.75 / floor_hz`.
    pub time_step: f64,
    /// Candidates kept per frame, including the unvoiced one.
    pub max_candidates: usize,
    /// Frames quieter than this fraction of the global peak lean unvoiced.
    pub silence_threshold: f64,
    /// Minimum normalized autocorrelation for a voiced frame.
    pub voicing_threshold: f64,
    /// Bias towards higher-frequency candidates.
    pub octave_cost: f64,
    /// Path cost per octave of frame-to-frame pitch change.
    pub octave_jump_cost: f64,
    /// Path cost of a voiced/unvoiced transition.
    pub voiced_unvoiced_cost: f64,
    /// Window length expressed in periods of `floor_hz`.
    pub periods_per_window: f64,
}

impl Default for PitchParams {
    fn default() -> Self {
        Self {
            floor_hz: 60.0,
            ceiling_hz: 500.0,
            time_step: 0.0,
            max_candidates: 15,
            silence_threshold: 0.03,
            voicing_threshold: 0.45,
            octave_cost: 0.01,
            octave_jump_cost: 0.35,
            voiced_unvoiced_cost: 0.14,
            periods_per_window: 3.0,
        }
    }
}

impl PitchParams {
    pub(crate) fn effective_time_step(&self) -> f64 {
        if self.time_step > 0.0 {
            self.time_step
        } else {
            0.25 * self.periods_per_window / self.floor_hz
        }
    }

    pub(crate) fn window_seconds(&self) -> f64 {
        self.periods_per_window / self.floor_hz
    }
}

/// Period and amplitude bounds shared by the jitter and shimmer measures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerturbationParams {
    /// Shortest admissible period in seconds.
    pub period_floor: f64,
    /// Longest admissible period in seconds.
    pub period_ceiling: f64,
    /// Largest admissible ratio between consecutive periods.
    pub max_period_factor: f64,
    /// Largest admissible ratio between consecutive amplitudes.
    pub max_amplitude_factor: f64,
}

impl Default for PerturbationParams {
    fn default() -> Self {
        Self {
            period_floor: 0.0001,
            period_ceiling: 0.02,
            max_period_factor: 1.3,
            max_amplitude_factor: 1.6,
        }
    }
}

/// Cross-correlation harmonicity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonicityParams {
    pub time_step: f64,
    pub min_pitch_hz: f64,
    pub silence_threshold: f64,
    pub periods_per_window: f64,
}

impl Default for HarmonicityParams {
    fn default() -> Self {
        Self {
            time_step: 0.01,
            min_pitch_hz: 75.0,
            silence_threshold: 0.1,
            periods_per_window: 1.0,
        }
    }
}

/// Intensity contour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityParams {
    pub min_pitch_hz: f64,
    /// Frame step in seconds; `0.0` means `0.8 / min_pitch_hz`.
    pub time_step: f64,
    /// Remove the DC offset of each frame before measuring power.
    pub subtract_mean: bool,
}

impl Default for IntensityParams {
    fn default() -> Self {
        Self {
            min_pitch_hz: 75.0,
            time_step: 0.0,
            subtract_mean: true,
        }
    }
}

impl IntensityParams {
    pub(crate) fn window_seconds(&self) -> f64 {
        6.4 / self.min_pitch_hz
    }

    pub(crate) fn effective_time_step(&self) -> f64 {
        if self.time_step > 0.0 {
            self.time_step
        } else {
            0.8 / self.min_pitch_hz
        }
    }
}

/// Burg linear-prediction formant analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormantParams {
    /// Frame step in seconds; `0.0` means a quarter of `window_length`.
    pub time_step: f64,
    /// Formants tracked per frame. The LPC order is twice this.
    pub max_formants: usize,
    /// Highest formant frequency in Hz; the signal is resampled to twice this.
    pub ceiling_hz: f64,
    /// Effective window length in seconds. The Gaussian window spans twice this.
    pub window_length: f64,
    /// Pre-emphasis corner frequency in Hz.
    pub pre_emphasis_from_hz: f64,
}

impl Default for FormantParams {
    fn default() -> Self {
        Self {
            time_step: 0.0,
            max_formants: 5,
            ceiling_hz: 5500.0,
            window_length: 0.025,
            pre_emphasis_from_hz: 50.0,
        }
    }
}

impl FormantParams {
    pub(crate) fn effective_time_step(&self) -> f64 {
        if self.time_step > 0.0 {
            self.time_step
        } else {
            self.window_length / 4.0
        }
    }

    pub(crate) fn window_seconds(&self) -> f64 {
        2.0 * self.window_length
    }
}

/// The full extraction parameterization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExtractionParams {
    pub pitch: PitchParams,
    pub perturbation: PerturbationParams,
    pub harmonicity: HarmonicityParams,
    pub intensity: IntensityParams,
    pub formant: FormantParams,
}

impl ExtractionParams {
    /// Shortest signal every stage can analyze.
    pub fn min_duration_seconds(&self) -> f64 {
        self.pitch
            .window_seconds()
            .max(self.intensity.window_seconds())
            .max(self.formant.window_seconds())
    }
}
