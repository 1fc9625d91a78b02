use tracing::{debug, info};

use super::features::FeatureVector;
use super::formant::track_formants;
use super::harmonicity::mean_harmonicity;
use super::intensity::{intensity_contour, intensity_stats};
use super::params::ExtractionParams;
use super::perturbation::{jitter, period_amplitudes, shimmer};
use super::pitch::track_pitch;
use super::pulses::detect_pulses;
use crate::audio::AudioSignal;
use crate::error::AnalysisError;

/// Peak deviation from the mean below which a signal counts as silent.
const SILENCE_EPSILON: f64 = 1e-9;

/// Extract the 29-measurement vector with the default parameterization.
pub fn extract_features(signal: &AudioSignal) -> Result<FeatureVector, AnalysisError> {
    extract_features_with(signal, &ExtractionParams::default())
}

/// Extract the 29-measurement vector with a custom parameterization.
///
/// Fails instead of zero-filling when a measure cannot be computed, so a
/// returned vector is always complete and finite.
///
/// Harmonicity searches lags down to `harmonicity.min_pitch_hz` (75 Hz by
/// default) while the pitch tracker reaches `pitch.floor_hz` (60 Hz). A voice
/// whose f0 sits between the two has pulses and jitter but no harmonicity
/// frame, and fails with `UndefinedMeasure("meanAutoCorrHarmonicity")`.
/// Lower `harmonicity.min_pitch_hz` to analyze such voices.
pub fn extract_features_with(
    signal: &AudioSignal,
    params: &ExtractionParams,
) -> Result<FeatureVector, AnalysisError> {
    let samples = signal.samples();
    if samples.is_empty() {
        return Err(AnalysisError::EmptySignal);
    }
    let duration = signal.duration_seconds();
    let required = params.min_duration_seconds();
    if duration < required {
        return Err(AnalysisError::TooShort { duration, required });
    }
    if is_silent(samples) {
        return Err(AnalysisError::Silent);
    }
    let rate = f64::from(signal.sample_rate());

    let pitch = track_pitch(samples, rate, &params.pitch)
        .ok_or(AnalysisError::TooShort { duration, required })?;
    let pulses = detect_pulses(samples, rate, &pitch);
    debug!(
        "Detected {} pulses over {} voiced frames",
        pulses.len(),
        pitch.voiced_count()
    );
    if pulses.len() < 2 {
        return Err(AnalysisError::InsufficientPulses {
            found: pulses.len(),
        });
    }
    let periods = pulses.periods();
    let mean_period = periods.iter().sum::<f64>() / periods.len() as f64;
    let std_dev_period = (periods
        .iter()
        .map(|p| (p - mean_period).powi(2))
        .sum::<f64>()
        / periods.len() as f64)
        .sqrt();

    let undefined = |measure| AnalysisError::UndefinedMeasure { measure };
    let jitter = jitter(&periods, &params.perturbation).map_err(undefined)?;
    let amplitudes = period_amplitudes(samples, rate, &pulses);
    let shimmer = shimmer(&periods, &amplitudes, &params.perturbation).map_err(undefined)?;

    let hnr = mean_harmonicity(samples, rate, &params.harmonicity)
        .ok_or(undefined("meanAutoCorrHarmonicity"))?;
    let harm_to_noise = 10f64.powf(hnr / 10.0);

    let intensity = intensity_stats(&intensity_contour(samples, rate, &params.intensity))
        .ok_or(undefined("meanIntensity"))?;

    let formants = track_formants(samples, rate, &params.formant).ok_or(undefined("f1"))?;
    let midpoint = 0.5 * duration;
    let mut centre = [0.0; 4];
    let mut bandwidth = [0.0; 4];
    for number in 1..=4 {
        centre[number - 1] = formants
            .mean_frequency(number)
            .ok_or(undefined(["f1", "f2", "f3", "f4"][number - 1]))?;
        bandwidth[number - 1] = formants
            .bandwidth_at(number, midpoint)
            .ok_or(undefined(["b1", "b2", "b3", "b4"][number - 1]))?;
    }

    let vector = FeatureVector {
        num_pulses: pulses.len() as f64,
        num_periods_pulses: periods.len() as f64,
        mean_period_pulses: mean_period,
        std_dev_period_pulses: std_dev_period,
        loc_pct_jitter: jitter.local,
        loc_abs_jitter: jitter.local_absolute,
        rap_jitter: jitter.rap,
        ppq5_jitter: jitter.ppq5,
        ddp_jitter: jitter.ddp,
        loc_shimmer: shimmer.local,
        loc_db_shimmer: shimmer.local_db,
        apq3_shimmer: shimmer.apq3,
        apq5_shimmer: shimmer.apq5,
        apq11_shimmer: shimmer.apq11,
        dda_shimmer: shimmer.dda,
        mean_auto_corr_harmonicity: hnr,
        mean_noise_to_harm_harmonicity: 1.0 / harm_to_noise,
        mean_harm_to_noise_harmonicity: harm_to_noise,
        min_intensity: intensity.min,
        max_intensity: intensity.max,
        mean_intensity: intensity.mean,
        f1: centre[0],
        f2: centre[1],
        f3: centre[2],
        f4: centre[3],
        b1: bandwidth[0],
        b2: bandwidth[1],
        b3: bandwidth[2],
        b4: bandwidth[3],
    };
    if let Some(feature) = vector.first_non_finite() {
        return Err(AnalysisError::NonFinite { feature });
    }
    info!(
        "Extracted features: {} pulses, HNR {:.2} dB, F1 {:.0} Hz",
        pulses.len(),
        hnr,
        vector.f1
    );
    Ok(vector)
}

/// No excursion from the mean: all-zero or constant (DC) input.
fn is_silent(samples: &[f64]) -> bool {
    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    samples
        .iter()
        .all(|&s| (s - mean).abs() <= SILENCE_EPSILON)
}
