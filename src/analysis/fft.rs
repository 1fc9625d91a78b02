use std::f64::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

pub(crate) fn hann_window(length: usize) -> Vec<f64> {
    if length <= 1 {
        return vec![1.0; length.max(1)];
    }
    let denom = (length + 1) as f64;
    (0..length)
        .map(|n| 0.5 - 0.5 * (2.0 * PI * (n + 1) as f64 / denom).cos())
        .collect()
}

/// Gaussian window that reaches zero at both ends.
pub(crate) fn gaussian_window(length: usize) -> Vec<f64> {
    if length <= 1 {
        return vec![1.0; length.max(1)];
    }
    let mid = 0.5 * (length as f64 - 1.0);
    let denom = (length as f64 + 1.0).powi(2);
    let edge = (-12.0_f64).exp();
    (0..length)
        .map(|i| {
            let d = i as f64 - mid;
            ((-48.0 * d * d / denom).exp() - edge) / (1.0 - edge)
        })
        .collect()
}

/// Kaiser window (β = 2π² + 0.5) spanning `2 * half + 1` samples.
pub(crate) fn kaiser_window(half: usize) -> Vec<f64> {
    let beta = 2.0 * PI * PI + 0.5;
    let half_f = half.max(1) as f64;
    (0..=2 * half)
        .map(|i| {
            let x = (i as f64 - half as f64) / half_f;
            let root = 1.0 - x * x;
            if root <= 0.0 {
                0.0
            } else {
                bessel_i0(beta * root.sqrt())
            }
        })
        .collect()
}

/// Modified Bessel function of the first kind, order zero.
pub(crate) fn bessel_i0(x: f64) -> f64 {
    let quarter_sq = 0.25 * x * x;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    while term > sum * 1e-17 {
        term *= quarter_sq / (k * k);
        sum += term;
        k += 1.0;
    }
    sum
}

/// Reusable FFT plans for linear (non-circular) autocorrelation of fixed-length frames.
pub(crate) struct Autocorrelator {
    len: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    buffer: Vec<Complex64>,
}

impl Autocorrelator {
    /// Plan for frames of up to `frame_len` samples.
    pub(crate) fn new(frame_len: usize) -> Self {
        let len = (2 * frame_len.max(1)).next_power_of_two();
        let mut planner = FftPlanner::new();
        Self {
            len,
            forward: planner.plan_fft_forward(len),
            inverse: planner.plan_fft_inverse(len),
            buffer: vec![Complex64::new(0.0, 0.0); len],
        }
    }

    /// Autocorrelation for lags `0..=max_lag`.
    pub(crate) fn compute(&mut self, frame: &[f64], max_lag: usize) -> Vec<f64> {
        for (slot, &value) in self
            .buffer
            .iter_mut()
            .zip(frame.iter().chain(std::iter::repeat(&0.0)))
        {
            *slot = Complex64::new(value, 0.0);
        }
        self.forward.process(&mut self.buffer);
        for bin in &mut self.buffer {
            *bin = Complex64::new(bin.norm_sqr(), 0.0);
        }
        self.inverse.process(&mut self.buffer);
        let scale = 1.0 / self.len as f64;
        self.buffer
            .iter()
            .take(max_lag.min(self.len - 1) + 1)
            .map(|c| c.re * scale)
            .collect()
    }
}

/// Band-limited resampling by spectral truncation or zero-padding.
pub(crate) fn resample_spectral(samples: &[f64], input_rate: f64, output_rate: f64) -> Vec<f64> {
    let n = samples.len();
    if n == 0 || (input_rate - output_rate).abs() < 1e-9 {
        return samples.to_vec();
    }
    let m = ((n as f64 * output_rate / input_rate).round() as usize).max(1);
    let mut planner = FftPlanner::new();
    let mut spectrum: Vec<Complex64> = samples.iter().map(|&s| Complex64::new(s, 0.0)).collect();
    planner.plan_fft_forward(n).process(&mut spectrum);

    let mut out = vec![Complex64::new(0.0, 0.0); m];
    let keep = (n.min(m) - 1) / 2;
    out[0] = spectrum[0];
    for k in 1..=keep {
        out[k] = spectrum[k];
        out[m - k] = spectrum[n - k];
    }
    planner.plan_fft_inverse(m).process(&mut out);
    let scale = 1.0 / n as f64;
    out.iter().map(|c| c.re * scale).collect()
}
