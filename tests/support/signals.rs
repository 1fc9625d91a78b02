use std::f64::consts::TAU;

use pearlyx::AudioSignal;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Pure tone quantized to 16-bit steps, as a recording would be.
pub fn sine(freq_hz: f64, seconds: f64, sample_rate: u32, amplitude: f64) -> Vec<f64> {
    let len = (seconds * sample_rate as f64).round() as usize;
    (0..len)
        .map(|i| {
            let value = amplitude * (TAU * freq_hz * i as f64 / sample_rate as f64).sin();
            (value * 32_767.0).round() / 32_767.0
        })
        .collect()
}

/// Harmonic-rich tone: fundamental plus two decaying overtones over faint seeded noise.
pub fn vowel_like(f0_hz: f64, seconds: f64, sample_rate: u32) -> Vec<f64> {
    let len = (seconds * sample_rate as f64).round() as usize;
    let mut rng = StdRng::seed_from_u64(7);
    (0..len)
        .map(|i| {
            let phase = TAU * f0_hz * i as f64 / sample_rate as f64;
            0.5 * phase.sin()
                + 0.25 * (2.0 * phase).sin()
                + 0.12 * (3.0 * phase).sin()
                + rng.random_range(-1e-3..1e-3)
        })
        .collect()
}

pub fn signal(samples: Vec<f64>, sample_rate: u32) -> AudioSignal {
    AudioSignal::new(samples, sample_rate).expect("valid signal")
}
