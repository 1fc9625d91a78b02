//! Harmonics-to-noise ratio by forward cross-correlation.
//!
//! Each frame correlates a window of one minimum-pitch period with its lagged
//! copy. The best normalized correlation `r` becomes `10·log10(r / (1 − r))`
//! dB; frames judged silent or aperiodic carry no value and are left out of
//! the mean. Periods longer than `1 / min_pitch_hz` are out of reach, so a
//! voice pitched below that floor has no voiced frames at all.

use super::frames::{FrameLayout, parabolic_peak, segment, segment_start};
use super::params::HarmonicityParams;

const MAX_CORRELATION: f64 = 1.0 - 1e-15;

/// Harmonicity in dB per frame, `None` for unvoiced frames.
pub(crate) fn harmonicity_frames(
    samples: &[f64],
    sample_rate: f64,
    params: &HarmonicityParams,
) -> Vec<Option<f64>> {
    let window = params.periods_per_window / params.min_pitch_hz;
    let max_lag = (sample_rate / params.min_pitch_hz).ceil() as usize;
    let window_len = ((window * sample_rate).floor() as usize).max(2);
    let frame_len = window_len + max_lag + 1;
    let duration = samples.len() as f64 / sample_rate;
    let Some(layout) = FrameLayout::new(duration, frame_len as f64 / sample_rate, params.time_step)
    else {
        return Vec::new();
    };

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let global_peak = samples
        .iter()
        .map(|s| (s - mean).abs())
        .fold(0.0_f64, f64::max);
    if global_peak <= 0.0 {
        return vec![None; layout.count];
    }

    (0..layout.count)
        .map(|index| {
            let start = segment_start(layout.time(index), sample_rate, frame_len);
            let mut frame = segment(samples, start, frame_len);
            let frame_mean = frame.iter().sum::<f64>() / frame_len as f64;
            frame.iter_mut().for_each(|s| *s -= frame_mean);
            let local_peak = frame.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));
            let unvoiced_strength =
                (2.0 - (local_peak / global_peak) / params.silence_threshold).max(0.0);
            let r = best_correlation(&frame, window_len, max_lag)?;
            (r > unvoiced_strength).then(|| {
                let r = r.min(MAX_CORRELATION);
                10.0 * (r / (1.0 - r)).log10()
            })
        })
        .collect()
}

/// Temporal mean of the voiced frames' harmonicity.
pub(crate) fn mean_harmonicity(
    samples: &[f64],
    sample_rate: f64,
    params: &HarmonicityParams,
) -> Option<f64> {
    let frames = harmonicity_frames(samples, sample_rate, params);
    let voiced: Vec<f64> = frames.into_iter().flatten().collect();
    tracing::debug!("Harmonicity: {} voiced frames", voiced.len());
    if voiced.is_empty() {
        return None;
    }
    Some(voiced.iter().sum::<f64>() / voiced.len() as f64)
}

/// Highest local maximum of the normalized cross-correlation over lags `2..=max_lag`.
fn best_correlation(frame: &[f64], window_len: usize, max_lag: usize) -> Option<f64> {
    let head = &frame[..window_len];
    let head_energy: f64 = head.iter().map(|s| s * s).sum();
    if head_energy <= 0.0 {
        return None;
    }
    let mut r = vec![0.0; max_lag + 2];
    for (lag, value) in r.iter_mut().enumerate().skip(1) {
        let Some(lagged) = frame.get(lag..lag + window_len) else {
            break;
        };
        let mut cross = 0.0;
        let mut energy = 0.0;
        for (a, b) in head.iter().zip(lagged) {
            cross += a * b;
            energy += b * b;
        }
        if energy > 0.0 {
            *value = cross / (head_energy * energy).sqrt();
        }
    }
    let mut best: Option<f64> = None;
    for lag in 2..=max_lag.min(r.len() - 2) {
        let (prev, here, next) = (r[lag - 1], r[lag], r[lag + 1]);
        if here > 0.0 && here > prev && here >= next {
            let (_, peak) = parabolic_peak(prev, here, next);
            let peak = peak.min(1.0);
            if best.is_none_or(|b| peak > b) {
                best = Some(peak);
            }
        }
    }
    best
}
