//! Glottal pulse detection by waveform cross-correlation.
//!
//! Inside each voiced interval a first pulse is placed on the absolute
//! extremum near the interval's midpoint. From there the search walks left and
//! right one local period at a time, placing each next pulse where a
//! period-long window correlates best with the window around the previous one.

use super::frames::{parabolic_peak, sample_index, sample_time};
use super::pitch::PitchContour;

const MIN_CORRELATION: f64 = 0.3;
const MIN_RELATIVE_PEAK: f64 = 0.01;

/// Ordered glottal closure instants.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PulseTrain {
    times: Vec<f64>,
}

impl PulseTrain {
    pub fn from_times(mut times: Vec<f64>) -> Self {
        times.sort_by(f64::total_cmp);
        Self { times }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Inter-pulse intervals, in seconds.
    pub fn periods(&self) -> Vec<f64> {
        self.times.windows(2).map(|w| w[1] - w[0]).collect()
    }
}

/// Derive the pulse train of `samples` guided by `pitch`.
pub fn detect_pulses(samples: &[f64], sample_rate: f64, pitch: &PitchContour) -> PulseTrain {
    let global_peak = samples.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));
    if global_peak <= 0.0 {
        return PulseTrain::default();
    }
    let mut times = Vec::new();
    for (left, right) in pitch.voiced_intervals() {
        let middle = 0.5 * (left + right);
        let Some(f0) = pitch.value_at(middle) else {
            continue;
        };
        let Some(anchor) = find_extremum(samples, sample_rate, middle - 0.5 / f0, middle + 0.5 / f0)
        else {
            continue;
        };
        times.push(anchor);
        walk(samples, sample_rate, pitch, anchor, left, right, global_peak, Direction::Left, &mut times);
        walk(samples, sample_rate, pitch, anchor, left, right, global_peak, Direction::Right, &mut times);
    }
    let mut train = PulseTrain::from_times(times);
    train.times.dedup_by(|b, a| (*b - *a).abs() < 1e-6);
    train
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Left,
    Right,
}

#[allow(clippy::too_many_arguments)]
fn walk(
    samples: &[f64],
    sample_rate: f64,
    pitch: &PitchContour,
    anchor: f64,
    left: f64,
    right: f64,
    global_peak: f64,
    direction: Direction,
    out: &mut Vec<f64>,
) {
    let mut current = anchor;
    loop {
        let Some(f0) = pitch.value_at(current) else {
            break;
        };
        let period = 1.0 / f0;
        let (from, to) = match direction {
            Direction::Left => (current - 1.25 * period, current - 0.8 * period),
            Direction::Right => (current + 0.8 * period, current + 1.25 * period),
        };
        let next = match max_correlation(samples, sample_rate, current, period, from, to) {
            Some(found) => found,
            None => Correlation {
                time: match direction {
                    Direction::Left => current - period,
                    Direction::Right => current + period,
                },
                value: -1.0,
                peak: 0.0,
            },
        };
        let outside = match direction {
            Direction::Left => next.time < left,
            Direction::Right => next.time > right,
        };
        if outside {
            break;
        }
        if next.value > MIN_CORRELATION
            && (next.peak == 0.0 || next.peak > MIN_RELATIVE_PEAK * global_peak)
        {
            out.push(next.time);
        }
        current = next.time;
    }
}

#[derive(Debug, Clone, Copy)]
struct Correlation {
    time: f64,
    value: f64,
    peak: f64,
}

/// Slide a period-long window over `[from, to]` and correlate it with the window at `reference`.
///
/// The returned time is `reference` shifted by the best lag, so fractional
/// pulse positions carry over from one period to the next.
fn max_correlation(
    samples: &[f64],
    sample_rate: f64,
    reference: f64,
    window: f64,
    from: f64,
    to: f64,
) -> Option<Correlation> {
    let half = ((0.5 * window * sample_rate).round() as isize).max(1);
    let ref_centre = sample_index(reference, sample_rate, samples.len()) as isize;
    let first = sample_index(from, sample_rate, samples.len()) as isize;
    let last = sample_index(to, sample_rate, samples.len()) as isize;
    let len = samples.len() as isize;
    if ref_centre - half < 0 || ref_centre + half >= len || last <= first {
        return None;
    }
    let reference_window = &samples[(ref_centre - half) as usize..=(ref_centre + half) as usize];
    let ref_energy: f64 = reference_window.iter().map(|s| s * s).sum();

    let mut scores: Vec<(isize, f64)> = Vec::new();
    for centre in first..=last {
        if centre - half < 0 || centre + half >= len {
            continue;
        }
        let candidate = &samples[(centre - half) as usize..=(centre + half) as usize];
        let mut cross = 0.0;
        let mut energy = 0.0;
        for (a, b) in reference_window.iter().zip(candidate) {
            cross += a * b;
            energy += b * b;
        }
        let denom = (ref_energy * energy).sqrt();
        let value = if denom > 0.0 { cross / denom } else { 0.0 };
        scores.push((centre, value));
    }
    let (best_idx, &(best_centre, best_value)) = scores
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.1.total_cmp(&b.1.1))?;

    let mut offset = 0.0;
    let mut value = best_value;
    if best_idx > 0 && best_idx + 1 < scores.len() {
        (offset, value) = parabolic_peak(scores[best_idx - 1].1, best_value, scores[best_idx + 1].1);
        value = value.min(1.0);
    }
    let window_slice = &samples[(best_centre - half) as usize..=(best_centre + half) as usize];
    let peak = window_slice.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));
    let lag = (best_centre - ref_centre) as f64 + offset;
    Some(Correlation {
        time: reference + lag / sample_rate,
        value,
        peak,
    })
}

/// Time of the largest absolute sample in `[from, to]`, refined parabolically.
fn find_extremum(samples: &[f64], sample_rate: f64, from: f64, to: f64) -> Option<f64> {
    let first = sample_index(from, sample_rate, samples.len());
    let last = sample_index(to, sample_rate, samples.len());
    if last <= first {
        return None;
    }
    let (idx, _) = samples[first..=last]
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))?;
    let idx = first + idx;
    let mut offset = 0.0;
    if idx > 0 && idx + 1 < samples.len() {
        let (y0, y1, y2) = (samples[idx - 1].abs(), samples[idx].abs(), samples[idx + 1].abs());
        (offset, _) = parabolic_peak(y0, y1, y2);
    }
    Some(sample_time(idx as f64 + offset, sample_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::params::PitchParams;
    use crate::analysis::pitch::track_pitch;
    use std::f64::consts::PI;

    #[test]
    fn steady_tone_yields_one_pulse_per_cycle() {
        let sr = 16_000.0;
        let freq = 125.0;
        let samples: Vec<f64> = (0..8_000)
            .map(|i| 0.7 * (2.0 * PI * freq * i as f64 / sr).sin())
            .collect();
        let pitch = track_pitch(&samples, sr, &PitchParams::default()).unwrap();
        let pulses = detect_pulses(&samples, sr, &pitch);
        assert!(pulses.len() >= 55 && pulses.len() <= 63, "{}", pulses.len());
        for period in pulses.periods() {
            assert!((period - 1.0 / freq).abs() < 1e-4, "{period}");
        }
    }

    #[test]
    fn periods_are_consecutive_differences() {
        let train = PulseTrain::from_times(vec![0.3, 0.1, 0.2]);
        let periods = train.periods();
        assert_eq!(train.times(), &[0.1, 0.2, 0.3]);
        assert!((periods[0] - 0.1).abs() < 1e-12 && (periods[1] - 0.1).abs() < 1e-12);
    }
}
