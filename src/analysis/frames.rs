//! Short-term analysis framing shared by every contour.
//!
//! Sample `i` sits at time `(i + 0.5) / sample_rate`; frames are centred on the
//! signal so that leftover time is split evenly between both ends.

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FrameLayout {
    pub(crate) count: usize,
    pub(crate) first_time: f64,
    pub(crate) step: f64,
}

impl FrameLayout {
    /// Lay out frames of `window` seconds every `step` seconds; `None` if no frame fits.
    pub(crate) fn new(duration: f64, window: f64, step: f64) -> Option<Self> {
        if !(step > 0.0) || !(window > 0.0) || window > duration {
            return None;
        }
        let count = ((duration - window) / step + 1e-9).floor() as usize + 1;
        let first_time = 0.5 * duration - 0.5 * count as f64 * step + 0.5 * step;
        Some(Self {
            count,
            first_time,
            step,
        })
    }

    pub(crate) fn time(&self, index: usize) -> f64 {
        self.first_time + index as f64 * self.step
    }

    /// Fractional frame index for a time.
    pub(crate) fn position(&self, time: f64) -> f64 {
        (time - self.first_time) / self.step
    }
}

/// First sample index of a `len`-sample segment centred on `time`.
pub(crate) fn segment_start(time: f64, sample_rate: f64, len: usize) -> isize {
    let centre = time * sample_rate - 0.5;
    (centre - 0.5 * (len as f64 - 1.0)).round() as isize
}

/// Copy `len` samples starting at `start`, zero-filling outside the signal.
pub(crate) fn segment(samples: &[f64], start: isize, len: usize) -> Vec<f64> {
    (0..len)
        .map(|offset| {
            let idx = start + offset as isize;
            if idx < 0 {
                0.0
            } else {
                samples.get(idx as usize).copied().unwrap_or(0.0)
            }
        })
        .collect()
}

/// Time of sample `index`.
pub(crate) fn sample_time(index: f64, sample_rate: f64) -> f64 {
    (index + 0.5) / sample_rate
}

/// Nearest sample index to `time`, clamped to the signal.
pub(crate) fn sample_index(time: f64, sample_rate: f64, len: usize) -> usize {
    let idx = (time * sample_rate - 0.5).round();
    if idx <= 0.0 {
        0
    } else {
        (idx as usize).min(len.saturating_sub(1))
    }
}

/// Refine a discrete extremum at `y1` using its neighbours; returns `(offset, value)`.
pub(crate) fn parabolic_peak(y0: f64, y1: f64, y2: f64) -> (f64, f64) {
    let curvature = y0 - 2.0 * y1 + y2;
    if curvature == 0.0 {
        return (0.0, y1);
    }
    let offset = (0.5 * (y0 - y2) / curvature).clamp(-0.5, 0.5);
    let value = y1 - 0.25 * (y0 - y2) * offset;
    (offset, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_are_centred_on_the_signal() {
        let layout = FrameLayout::new(1.0, 0.05, 0.0125).unwrap();
        assert_eq!(layout.count, 77);
        let last = layout.time(layout.count - 1);
        assert!((layout.first_time - (1.0 - last)).abs() < 1e-9);
    }

    #[test]
    fn window_longer_than_signal_has_no_frames() {
        assert!(FrameLayout::new(0.01, 0.05, 0.01).is_none());
    }

    #[test]
    fn parabolic_peak_recovers_vertex() {
        // y = -(x - 0.25)^2 sampled at -1, 0, 1
        let f = |x: f64| -(x - 0.25) * (x - 0.25);
        let (offset, value) = parabolic_peak(f(-1.0), f(0.0), f(1.0));
        assert!((offset - 0.25).abs() < 1e-12);
        assert!(value.abs() < 1e-12);
    }

    #[test]
    fn segment_zero_pads_outside_signal() {
        let out = segment(&[1.0, 2.0, 3.0], -1, 5);
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 0.0]);
    }
}
