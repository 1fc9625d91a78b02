use super::super::frames::{parabolic_peak, sample_index};
use super::super::params::PerturbationParams;
use super::super::pulses::PulseTrain;
use super::{Admissible, PeriodBounds, mean_abs_over_windows, within_factor};

/// Amplitude perturbation measures; relative values are fractions of the mean amplitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Shimmer {
    pub(crate) local: f64,
    pub(crate) local_db: f64,
    pub(crate) apq3: f64,
    pub(crate) apq5: f64,
    pub(crate) apq11: f64,
    pub(crate) dda: f64,
}

/// Peak absolute amplitude of each period between consecutive pulses.
pub(crate) fn period_amplitudes(samples: &[f64], sample_rate: f64, pulses: &PulseTrain) -> Vec<f64> {
    pulses
        .times()
        .windows(2)
        .map(|w| peak_between(samples, sample_rate, w[0], w[1]))
        .collect()
}

fn peak_between(samples: &[f64], sample_rate: f64, from: f64, to: f64) -> f64 {
    let first = sample_index(from, sample_rate, samples.len());
    let last = sample_index(to, sample_rate, samples.len());
    let Some((offset, &peak)) = samples[first..=last.max(first)]
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.abs().total_cmp(&b.1.abs()))
    else {
        return 0.0;
    };
    let idx = first + offset;
    if idx == 0 || idx + 1 >= samples.len() {
        return peak.abs();
    }
    let (_, refined) = parabolic_peak(
        samples[idx - 1].abs(),
        samples[idx].abs(),
        samples[idx + 1].abs(),
    );
    refined.max(peak.abs())
}

/// Compute every shimmer measure over per-period `amplitudes`.
pub(crate) fn shimmer(
    periods: &[f64],
    amplitudes: &[f64],
    params: &PerturbationParams,
) -> Result<Shimmer, &'static str> {
    debug_assert_eq!(periods.len(), amplitudes.len());
    let bounds = PeriodBounds::from(params);
    let admissible = Admissible::new(
        periods
            .iter()
            .zip(amplitudes)
            .map(|(&p, &a)| bounds.contains(p) && a > 0.0)
            .collect(),
        periods
            .windows(2)
            .zip(amplitudes.windows(2))
            .map(|(p, a)| {
                within_factor(p[0], p[1], params.max_period_factor)
                    && within_factor(a[0], a[1], params.max_amplitude_factor)
            })
            .collect(),
    );

    let valid: Vec<f64> = periods
        .iter()
        .zip(amplitudes)
        .filter(|(p, a)| bounds.contains(**p) && **a > 0.0)
        .map(|(_, &a)| a)
        .collect();
    if valid.is_empty() {
        return Err("locShimmer");
    }
    let mean_amplitude = valid.iter().sum::<f64>() / valid.len() as f64;

    let local =
        mean_abs_over_windows(amplitudes, 2, &admissible, |w| w[1] - w[0]).ok_or("locShimmer")?;
    let local_db = mean_abs_over_windows(amplitudes, 2, &admissible, |w| {
        20.0 * (w[1] / w[0]).log10()
    })
    .ok_or("locDbShimmer")?;
    let apq3 = mean_abs_over_windows(amplitudes, 3, &admissible, centred_deviation)
        .ok_or("apq3Shimmer")?;
    let apq5 = mean_abs_over_windows(amplitudes, 5, &admissible, centred_deviation)
        .ok_or("apq5Shimmer")?;
    let apq11 = mean_abs_over_windows(amplitudes, 11, &admissible, centred_deviation)
        .ok_or("apq11Shimmer")?;
    let dda = mean_abs_over_windows(amplitudes, 3, &admissible, |w| {
        (w[2] - w[1]) - (w[1] - w[0])
    })
    .ok_or("ddaShimmer")?;

    Ok(Shimmer {
        local: local / mean_amplitude,
        local_db,
        apq3: apq3 / mean_amplitude,
        apq5: apq5 / mean_amplitude,
        apq11: apq11 / mean_amplitude,
        dda: dda / mean_amplitude,
    })
}

/// Deviation of the centre value from the window mean.
fn centred_deviation(window: &[f64]) -> f64 {
    window[window.len() / 2] - window.iter().sum::<f64>() / window.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_amplitudes_have_zero_shimmer() {
        let periods = vec![0.005; 15];
        let amplitudes = vec![0.5; 15];
        let s = shimmer(&periods, &amplitudes, &PerturbationParams::default()).unwrap();
        assert_eq!(s.local, 0.0);
        assert_eq!(s.local_db, 0.0);
        assert_eq!(s.apq11, 0.0);
        assert_eq!(s.dda, 0.0);
    }

    #[test]
    fn alternating_amplitudes_match_hand_computation() {
        let periods = vec![0.005; 16];
        let amplitudes: Vec<f64> = (0..16).map(|i| if i % 2 == 0 { 0.4 } else { 0.5 }).collect();
        let s = shimmer(&periods, &amplitudes, &PerturbationParams::default()).unwrap();
        assert!((s.local - 0.1 / 0.45).abs() < 1e-9);
        assert!((s.local_db - 20.0 * (0.5_f64 / 0.4).log10()).abs() < 1e-9);
        assert!((s.dda - 3.0 * s.apq3).abs() < 1e-9);
    }

    #[test]
    fn amplitude_jumps_beyond_factor_are_skipped() {
        let periods = vec![0.005; 30];
        let mut amplitudes = vec![0.5; 30];
        amplitudes[7] = 0.05;
        let s = shimmer(&periods, &amplitudes, &PerturbationParams::default()).unwrap();
        assert_eq!(s.local, 0.0);
    }

    #[test]
    fn amplitudes_follow_waveform_peaks() {
        let sr = 8_000.0;
        let samples: Vec<f64> = (0..800)
            .map(|i| 0.6 * (2.0 * std::f64::consts::PI * 100.0 * i as f64 / sr).sin())
            .collect();
        let pulses = PulseTrain::from_times(vec![0.01, 0.02, 0.03, 0.04]);
        let amplitudes = period_amplitudes(&samples, sr, &pulses);
        assert_eq!(amplitudes.len(), 3);
        for a in amplitudes {
            assert!((a - 0.6).abs() < 0.01, "{a}");
        }
    }
}
