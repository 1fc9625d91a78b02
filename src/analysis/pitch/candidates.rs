use super::super::fft::{Autocorrelator, hann_window};
use super::super::frames::{FrameLayout, parabolic_peak, segment, segment_start};
use super::super::params::PitchParams;

/// One pitch hypothesis for a frame; `frequency == 0.0` is the unvoiced hypothesis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Candidate {
    pub(super) frequency: f64,
    pub(super) strength: f64,
}

impl Candidate {
    pub(super) fn is_voiced(&self) -> bool {
        self.frequency > 0.0
    }
}

/// Run windowed autocorrelation on every frame and collect ranked candidates.
pub(super) fn frame_candidates(
    samples: &[f64],
    sample_rate: f64,
    layout: &FrameLayout,
    params: &PitchParams,
    global_peak: f64,
) -> Vec<Vec<Candidate>> {
    let window_len = ((params.window_seconds() * sample_rate).floor() as usize).max(3);
    let window = hann_window(window_len);
    let min_lag = ((sample_rate / params.ceiling_hz).floor() as usize).max(2);
    let max_lag = ((sample_rate / params.floor_hz).ceil() as usize).min(window_len / 2);

    let mut correlator = Autocorrelator::new(window_len);
    let window_ac = correlator.compute(&window, max_lag + 1);
    let window_norm = window_ac[0];

    let mut frames = Vec::with_capacity(layout.count);
    for index in 0..layout.count {
        let start = segment_start(layout.time(index), sample_rate, window_len);
        let mut frame = segment(samples, start, window_len);
        let mean = frame.iter().sum::<f64>() / window_len as f64;
        let mut local_peak = 0.0_f64;
        for (value, &w) in frame.iter_mut().zip(&window) {
            *value -= mean;
            local_peak = local_peak.max(value.abs());
            *value *= w;
        }

        let unvoiced_strength = params.voicing_threshold
            + (2.0
                - (local_peak / global_peak)
                    / (params.silence_threshold / (1.0 + params.voicing_threshold)))
                .max(0.0);
        let mut candidates = vec![Candidate {
            frequency: 0.0,
            strength: unvoiced_strength,
        }];

        if local_peak > 0.0 && min_lag + 1 < max_lag {
            let ac = correlator.compute(&frame, max_lag + 1);
            if ac[0] > 0.0 {
                let r: Vec<f64> = (0..=max_lag + 1)
                    .map(|lag| (ac[lag] / ac[0]) / (window_ac[lag] / window_norm))
                    .collect();
                candidates.extend(voiced_candidates(&r, min_lag, max_lag, sample_rate, params));
            }
        }
        frames.push(candidates);
    }
    frames
}

fn voiced_candidates(
    r: &[f64],
    min_lag: usize,
    max_lag: usize,
    sample_rate: f64,
    params: &PitchParams,
) -> Vec<Candidate> {
    let mut found = Vec::new();
    for lag in min_lag.max(1)..=max_lag {
        let (prev, here, next) = (r[lag - 1], r[lag], r[lag + 1]);
        if !(here > prev && here >= next && here > 0.5 * params.voicing_threshold) {
            continue;
        }
        let (offset, mut peak) = parabolic_peak(prev, here, next);
        if peak > 1.0 {
            peak = 1.0 / peak;
        }
        let frequency = sample_rate / (lag as f64 + offset);
        if frequency < params.floor_hz || frequency > params.ceiling_hz {
            continue;
        }
        found.push(Candidate {
            frequency,
            strength: peak,
        });
    }
    found.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    found.truncate(params.max_candidates.saturating_sub(1).max(1));
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn sine_frame_yields_candidate_at_its_frequency() {
        let sr = 16_000.0;
        let samples: Vec<f64> = (0..8_000)
            .map(|i| (2.0 * PI * 220.0 * i as f64 / sr).sin())
            .collect();
        let params = PitchParams::default();
        let layout = FrameLayout::new(0.5, params.window_seconds(), 0.1).unwrap();
        let frames = frame_candidates(&samples, sr, &layout, &params, 1.0);
        let best = frames[1]
            .iter()
            .filter(|c| c.is_voiced())
            .max_by(|a, b| {
                let score = |c: &Candidate| {
                    c.strength - params.octave_cost * (params.ceiling_hz / c.frequency).log2()
                };
                score(a).total_cmp(&score(b))
            })
            .copied()
            .unwrap();
        assert!((best.frequency - 220.0).abs() < 2.0, "{best:?}");
        assert!(best.strength > 0.9);
    }

    #[test]
    fn silent_frame_has_only_unvoiced_candidate() {
        let params = PitchParams::default();
        let layout = FrameLayout::new(0.2, params.window_seconds(), 0.05).unwrap();
        let samples = vec![0.0; 3_200];
        let frames = frame_candidates(&samples, 16_000.0, &layout, &params, 1.0);
        assert!(frames.iter().all(|f| f.len() == 1 && !f[0].is_voiced()));
    }
}
