//! Formant tracking with Burg linear prediction.
//!
//! The signal is resampled to twice the formant ceiling and pre-emphasized.
//! Every Gaussian-windowed frame gets an LPC model whose pole angles and radii
//! give the formant frequencies and bandwidths.

mod burg;
mod roots;

use std::f64::consts::PI;

use super::fft::{gaussian_window, resample_spectral};
use super::frames::{FrameLayout, segment, segment_start};
use super::params::FormantParams;

const EDGE_MARGIN_HZ: f64 = 50.0;

/// One resonance in one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Formant {
    pub frequency: f64,
    pub bandwidth: f64,
}

/// Formants per frame, each frame sorted by frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct FormantTrack {
    layout: FrameLayout,
    frames: Vec<Vec<Formant>>,
}

impl FormantTrack {
    /// Mean frequency of formant `number` (1-based) over the frames that have it.
    pub fn mean_frequency(&self, number: usize) -> Option<f64> {
        let values: Vec<f64> = self
            .frames
            .iter()
            .filter_map(|f| formant_in(f, number))
            .map(|f| f.frequency)
            .collect();
        (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Bandwidth of formant `number` at `time`, linearly interpolated between frames.
    ///
    /// When a neighbouring frame lacks the formant, the nearest frames on either
    /// side that define it are used instead.
    pub fn bandwidth_at(&self, number: usize, time: f64) -> Option<f64> {
        let bandwidth = |index: usize| formant_in(&self.frames[index], number).map(|f| f.bandwidth);
        let last = self.frames.len().checked_sub(1)?;
        let position = self.layout.position(time).clamp(0.0, last as f64);
        let below = (0..=position.floor() as usize)
            .rev()
            .find_map(|i| bandwidth(i).map(|b| (i, b)));
        let above = (position.ceil() as usize..=last).find_map(|i| bandwidth(i).map(|b| (i, b)));
        match (below, above) {
            (Some((i0, b0)), Some((i1, b1))) if i1 > i0 => {
                let frac = (position - i0 as f64) / (i1 - i0) as f64;
                Some(b0 + (b1 - b0) * frac)
            }
            (Some((_, b)), _) | (None, Some((_, b))) => Some(b),
            (None, None) => None,
        }
    }
}

fn formant_in(frame: &[Formant], number: usize) -> Option<Formant> {
    number.checked_sub(1).and_then(|i| frame.get(i)).copied()
}

/// Track formants over `samples`; `None` when the signal is shorter than one window.
pub fn track_formants(
    samples: &[f64],
    sample_rate: f64,
    params: &FormantParams,
) -> Option<FormantTrack> {
    let target_rate = 2.0 * params.ceiling_hz;
    let (mut signal, rate) = if sample_rate > target_rate {
        (resample_spectral(samples, sample_rate, target_rate), target_rate)
    } else {
        (samples.to_vec(), sample_rate)
    };
    pre_emphasize(&mut signal, rate, params.pre_emphasis_from_hz);

    let duration = signal.len() as f64 / rate;
    let layout = FrameLayout::new(duration, params.window_seconds(), params.effective_time_step())?;
    let window_len = (params.window_seconds() * rate).floor() as usize;
    let window = gaussian_window(window_len);
    let order = 2 * params.max_formants;
    let nyquist = 0.5 * rate;

    let frames = (0..layout.count)
        .map(|index| {
            let start = segment_start(layout.time(index), rate, window_len);
            let mut frame = segment(&signal, start, window_len);
            frame.iter_mut().zip(&window).for_each(|(s, w)| *s *= w);
            let Some(coefficients) = burg::burg_coefficients(&frame, order) else {
                return Vec::new();
            };
            let mut formants: Vec<Formant> = roots::prediction_roots(&coefficients)
                .into_iter()
                .filter(|z| z.im >= 0.0)
                .map(|z| Formant {
                    frequency: z.arg() * rate / (2.0 * PI),
                    bandwidth: -z.norm().ln() * rate / PI,
                })
                .filter(|f| f.frequency > EDGE_MARGIN_HZ && f.frequency < nyquist - EDGE_MARGIN_HZ)
                .collect();
            formants.sort_by(|a, b| a.frequency.total_cmp(&b.frequency));
            formants.truncate(params.max_formants);
            formants
        })
        .collect();

    Some(FormantTrack { layout, frames })
}

/// First-order high-pass `x[i] -= α·x[i−1]` with `α = exp(−2π·f·dt)`.
fn pre_emphasize(signal: &mut [f64], rate: f64, from_hz: f64) {
    let alpha = (-2.0 * PI * from_hz / rate).exp();
    for i in (1..signal.len()).rev() {
        signal[i] -= alpha * signal[i - 1];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Impulse train through cascaded two-pole resonators.
    fn synthetic_vowel(rate: f64, seconds: f64, resonances: &[(f64, f64)]) -> Vec<f64> {
        let len = (rate * seconds) as usize;
        let period = (rate / 110.0) as usize;
        let mut signal: Vec<f64> = (0..len)
            .map(|i| if i % period == 0 { 1.0 } else { 0.0 })
            .collect();
        for &(freq, bw) in resonances {
            let r = (-PI * bw / rate).exp();
            let c1 = 2.0 * r * (2.0 * PI * freq / rate).cos();
            let c2 = -r * r;
            let mut y1 = 0.0;
            let mut y2 = 0.0;
            for s in signal.iter_mut() {
                let y = *s + c1 * y1 + c2 * y2;
                y2 = y1;
                y1 = y;
                *s = y;
            }
        }
        let peak = signal.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()));
        signal.iter().map(|s| 0.5 * s / peak).collect()
    }

    #[test]
    fn recovers_synthetic_vowel_resonances() {
        let targets = [(600.0, 80.0), (1200.0, 90.0), (2500.0, 120.0), (3500.0, 150.0)];
        let samples = synthetic_vowel(16_000.0, 0.5, &targets);
        let track = track_formants(&samples, 16_000.0, &FormantParams::default()).unwrap();
        for (number, (freq, _)) in targets.iter().enumerate() {
            let mean = track.mean_frequency(number + 1).unwrap();
            assert!((mean - freq).abs() < 0.15 * freq, "F{}: {mean}", number + 1);
        }
        let b1 = track.bandwidth_at(1, 0.25).unwrap();
        assert!(b1 > 0.0 && b1 < 500.0, "{b1}");
    }

    #[test]
    fn bandwidth_falls_back_to_frames_that_define_the_formant() {
        let formant = |bandwidth| Formant {
            frequency: 500.0,
            bandwidth,
        };
        let track = FormantTrack {
            layout: FrameLayout {
                count: 4,
                first_time: 0.0,
                step: 1.0,
            },
            frames: vec![vec![formant(100.0)], vec![], vec![], vec![formant(160.0)]],
        };
        assert_eq!(track.bandwidth_at(1, 1.5), Some(130.0));
        assert_eq!(track.bandwidth_at(1, 0.0), Some(100.0));
        assert_eq!(track.bandwidth_at(2, 1.5), None);
        assert_eq!(track.mean_frequency(1), Some(500.0));
    }

    #[test]
    fn too_short_signal_has_no_track() {
        assert!(track_formants(&[0.1; 100], 16_000.0, &FormantParams::default()).is_none());
    }
}
