//! Decoded mono audio handed to the feature extractor.

mod decode;

pub use decode::{DecodeError, load_file, load_wav};

use crate::error::AnalysisError;

/// A complete, decoded, single-channel recording.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSignal {
    samples: Vec<f64>,
    sample_rate: u32,
}

impl AudioSignal {
    /// Wrap mono samples, rejecting a zero sample rate or non-finite samples.
    pub fn new(samples: Vec<f64>, sample_rate: u32) -> Result<Self, AnalysisError> {
        if sample_rate == 0 {
            return Err(AnalysisError::InvalidSampleRate(sample_rate));
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(AnalysisError::NonFiniteSample { index });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Build a mono signal from interleaved frames by averaging channels.
    pub fn from_interleaved(
        samples: &[f32],
        channels: u16,
        sample_rate: u32,
    ) -> Result<Self, AnalysisError> {
        Self::new(downmix_to_mono(samples, channels), sample_rate)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds.
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

pub(crate) fn downmix_to_mono(samples: &[f32], channels: u16) -> Vec<f64> {
    let channels = channels.max(1) as usize;
    if channels == 1 {
        return samples.iter().map(|&s| sanitize_sample(s)).collect();
    }
    samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().map(|&s| sanitize_sample(s)).sum::<f64>() / channels as f64)
        .collect()
}

fn sanitize_sample(sample: f32) -> f64 {
    if sample.is_finite() {
        sample as f64
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_sample_rate() {
        let err = AudioSignal::new(vec![0.0; 10], 0).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidSampleRate(0));
    }

    #[test]
    fn rejects_non_finite_samples() {
        let err = AudioSignal::new(vec![0.0, f64::NAN, 0.1], 8_000).unwrap_err();
        assert_eq!(err, AnalysisError::NonFiniteSample { index: 1 });
    }

    #[test]
    fn downmix_averages_stereo_frames() {
        let signal = AudioSignal::from_interleaved(&[1.0, 0.0, 0.5, 0.5, -1.0], 2, 100).unwrap();
        assert_eq!(signal.samples(), &[0.5, 0.5]);
        assert!((signal.duration_seconds() - 0.02).abs() < 1e-12);
    }
}
