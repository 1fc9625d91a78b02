//! Autocorrelation pitch tracking with a dynamic-programming path finder.
//!
//! Each frame is Hann-windowed, its autocorrelation is divided by the window's
//! own autocorrelation, and local maxima in the `[floor, ceiling]` lag range
//! become candidates. A Viterbi pass then chooses one candidate per frame while
//! penalizing octave jumps and voicing transitions.

mod candidates;
mod path;

use super::frames::FrameLayout;
use super::params::PitchParams;

/// Pitch track over the whole signal.
#[derive(Debug, Clone, PartialEq)]
pub struct PitchContour {
    layout: FrameLayout,
    frequencies: Vec<Option<f64>>,
    duration: f64,
}

impl PitchContour {
    /// Frequency per frame; `None` marks unvoiced frames.
    pub fn frequencies(&self) -> &[Option<f64>] {
        &self.frequencies
    }

    /// Number of voiced frames.
    pub fn voiced_count(&self) -> usize {
        self.frequencies.iter().filter(|f| f.is_some()).count()
    }

    /// Pitch at `time`, linearly interpolated between neighbouring voiced frames.
    ///
    /// Undefined when the nearest frame is unvoiced.
    pub fn value_at(&self, time: f64) -> Option<f64> {
        let position = self.layout.position(time);
        let nearest = position.round();
        if nearest < 0.0 || nearest as usize >= self.frequencies.len() {
            return None;
        }
        let nearest_value = self.frequencies[nearest as usize]?;
        let left = position.floor();
        if left < 0.0 || left as usize + 1 >= self.frequencies.len() {
            return Some(nearest_value);
        }
        let left_idx = left as usize;
        match (self.frequencies[left_idx], self.frequencies[left_idx + 1]) {
            (Some(a), Some(b)) => {
                let frac = position - left;
                Some(a + (b - a) * frac)
            }
            _ => Some(nearest_value),
        }
    }

    /// Contiguous voiced stretches as `(start, end)` times, each frame covering one step.
    pub fn voiced_intervals(&self) -> Vec<(f64, f64)> {
        let half = 0.5 * self.layout.step;
        let mut intervals = Vec::new();
        let mut run_start: Option<usize> = None;
        for (idx, freq) in self.frequencies.iter().enumerate() {
            match (freq.is_some(), run_start) {
                (true, None) => run_start = Some(idx),
                (false, Some(start)) => {
                    intervals.push(self.interval(start, idx - 1, half));
                    run_start = None;
                }
                _ => {}
            }
        }
        if let Some(start) = run_start {
            intervals.push(self.interval(start, self.frequencies.len() - 1, half));
        }
        intervals
    }

    fn interval(&self, first: usize, last: usize, half: f64) -> (f64, f64) {
        (
            (self.layout.time(first) - half).max(0.0),
            (self.layout.time(last) + half).min(self.duration),
        )
    }
}

/// Track pitch over `samples`; `None` when the signal is shorter than one window.
pub fn track_pitch(
    samples: &[f64],
    sample_rate: f64,
    params: &PitchParams,
) -> Option<PitchContour> {
    let duration = samples.len() as f64 / sample_rate;
    let step = params.effective_time_step();
    let layout = FrameLayout::new(duration, params.window_seconds(), step)?;

    let mean = samples.iter().sum::<f64>() / samples.len() as f64;
    let global_peak = samples
        .iter()
        .map(|s| (s - mean).abs())
        .fold(0.0_f64, f64::max);
    if global_peak <= 0.0 {
        return Some(PitchContour {
            layout,
            frequencies: vec![None; layout.count],
            duration,
        });
    }

    let frames = candidates::frame_candidates(samples, sample_rate, &layout, params, global_peak);
    let frequencies = path::best_path(&frames, params, step);
    tracing::debug!(
        "Pitch: {} of {} frames voiced",
        frequencies.iter().filter(|f| f.is_some()).count(),
        layout.count
    );
    Some(PitchContour {
        layout,
        frequencies,
        duration,
    })
}
