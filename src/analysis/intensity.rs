//! Intensity contour in dB relative to the auditory threshold (2·10⁻⁵ Pa).

use super::fft::kaiser_window;
use super::frames::{FrameLayout, parabolic_peak, segment, segment_start};
use super::params::IntensityParams;

const REFERENCE_POWER: f64 = 4.0e-10;
const FLOOR_DB: f64 = -300.0;

/// Summary statistics of an intensity contour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IntensityStats {
    pub(crate) min: f64,
    pub(crate) max: f64,
    pub(crate) mean: f64,
}

/// Intensity per frame, in dB.
pub(crate) fn intensity_contour(
    samples: &[f64],
    sample_rate: f64,
    params: &IntensityParams,
) -> Vec<f64> {
    let duration = samples.len() as f64 / sample_rate;
    let Some(layout) = FrameLayout::new(
        duration,
        params.window_seconds(),
        params.effective_time_step(),
    ) else {
        return Vec::new();
    };
    let half = ((0.5 * params.window_seconds() * sample_rate).floor() as usize).max(1);
    let window = kaiser_window(half);
    let window_sum: f64 = window.iter().sum();

    (0..layout.count)
        .map(|index| {
            let start = segment_start(layout.time(index), sample_rate, window.len());
            let mut frame = segment(samples, start, window.len());
            if params.subtract_mean {
                let mean = frame.iter().sum::<f64>() / frame.len() as f64;
                frame.iter_mut().for_each(|s| *s -= mean);
            }
            let power = frame
                .iter()
                .zip(&window)
                .map(|(s, w)| s * s * w)
                .sum::<f64>()
                / window_sum;
            if power > 0.0 {
                (10.0 * (power / REFERENCE_POWER).log10()).max(FLOOR_DB)
            } else {
                FLOOR_DB
            }
        })
        .collect()
}

/// Extremes with parabolic refinement and the energy-averaged mean.
pub(crate) fn intensity_stats(contour: &[f64]) -> Option<IntensityStats> {
    if contour.is_empty() {
        return None;
    }
    let max = refined_extreme(contour, |v| v);
    let min = -refined_extreme(contour, |v| -v);
    let mean_power = contour.iter().map(|db| 10f64.powf(db / 10.0)).sum::<f64>() / contour.len() as f64;
    Some(IntensityStats {
        min,
        max,
        mean: 10.0 * mean_power.log10(),
    })
}

fn refined_extreme(contour: &[f64], orient: impl Fn(f64) -> f64) -> f64 {
    let (idx, best) = contour
        .iter()
        .map(|&v| orient(v))
        .enumerate()
        .fold((0, f64::NEG_INFINITY), |acc, (i, v)| if v > acc.1 { (i, v) } else { acc });
    if idx == 0 || idx + 1 >= contour.len() {
        return best;
    }
    let (_, value) = parabolic_peak(orient(contour[idx - 1]), best, orient(contour[idx + 1]));
    value.max(best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn steady_sine_has_flat_contour_at_expected_level() {
        let sr = 16_000.0;
        let amplitude = 0.1_f64;
        let samples: Vec<f64> = (0..16_000)
            .map(|i| amplitude * (2.0 * PI * 300.0 * i as f64 / sr).sin())
            .collect();
        let contour = intensity_contour(&samples, sr, &IntensityParams::default());
        let stats = intensity_stats(&contour).unwrap();
        let expected = 10.0 * (amplitude * amplitude / 2.0 / REFERENCE_POWER).log10();
        assert!((stats.mean - expected).abs() < 0.1, "{} vs {expected}", stats.mean);
        assert!(stats.max - stats.min < 0.2);
    }

    #[test]
    fn louder_half_raises_the_maximum() {
        let sr = 8_000.0;
        let samples: Vec<f64> = (0..16_000)
            .map(|i| {
                let gain = if i < 8_000 { 0.05 } else { 0.5 };
                gain * (2.0 * PI * 250.0 * i as f64 / sr).sin()
            })
            .collect();
        let stats = intensity_stats(&intensity_contour(&samples, sr, &IntensityParams::default()))
            .unwrap();
        assert!(stats.max - stats.min > 15.0);
        assert!(stats.mean > stats.min && stats.mean < stats.max);
    }

    #[test]
    fn energy_mean_leans_towards_loud_frames() {
        let stats = intensity_stats(&[40.0, 80.0]).unwrap();
        assert!((stats.mean - (80.0 - 10.0 * 2f64.log10())).abs() < 1e-3);
    }
}
