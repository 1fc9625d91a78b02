//! Cycle-to-cycle perturbation of period (jitter) and amplitude (shimmer).
//!
//! Every measure averages a windowed difference over the admissible stretches
//! of the pulse train. A window is admissible when each period in it lies in
//! `[period_floor, period_ceiling]` and no two neighbours differ by more than
//! the configured factor.

mod jitter;
mod shimmer;

pub(crate) use jitter::jitter;
pub(crate) use shimmer::{period_amplitudes, shimmer};

use super::params::PerturbationParams;

#[derive(Debug, Clone, Copy)]
pub(super) struct PeriodBounds {
    floor: f64,
    ceiling: f64,
    max_factor: f64,
}

impl From<&PerturbationParams> for PeriodBounds {
    fn from(params: &PerturbationParams) -> Self {
        Self {
            floor: params.period_floor,
            ceiling: params.period_ceiling,
            max_factor: params.max_period_factor,
        }
    }
}

impl PeriodBounds {
    pub(super) fn contains(&self, period: f64) -> bool {
        period >= self.floor && period <= self.ceiling
    }

    /// Mean of the periods inside the bounds.
    pub(super) fn mean_valid(&self, periods: &[f64]) -> Option<f64> {
        mean(periods.iter().copied().filter(|&p| self.contains(p)))
    }
}

/// Whether neighbouring values stay within `max_factor` of each other.
pub(super) fn within_factor(a: f64, b: f64, max_factor: f64) -> bool {
    if a <= 0.0 || b <= 0.0 {
        return false;
    }
    a.max(b) / a.min(b) <= max_factor
}

/// Per-item and per-neighbour-pair admissibility of a sequence.
#[derive(Debug, Clone)]
pub(super) struct Admissible {
    item: Vec<bool>,
    pair: Vec<bool>,
}

impl Admissible {
    pub(super) fn new(item: Vec<bool>, pair: Vec<bool>) -> Self {
        debug_assert!(item.is_empty() || pair.len() + 1 == item.len());
        Self { item, pair }
    }

    pub(super) fn for_periods(periods: &[f64], bounds: &PeriodBounds) -> Self {
        Self::new(
            periods.iter().map(|&p| bounds.contains(p)).collect(),
            periods
                .windows(2)
                .map(|w| within_factor(w[0], w[1], bounds.max_factor))
                .collect(),
        )
    }

    fn window(&self, start: usize, width: usize) -> bool {
        self.item[start..start + width].iter().all(|&ok| ok)
            && self.pair[start..start + width - 1].iter().all(|&ok| ok)
    }
}

/// Mean of `|measure(window)|` over every admissible window of `width` values.
pub(super) fn mean_abs_over_windows<F>(
    values: &[f64],
    width: usize,
    admissible: &Admissible,
    measure: F,
) -> Option<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if width == 0 || values.len() < width {
        return None;
    }
    mean(
        values
            .windows(width)
            .enumerate()
            .filter(|(start, _)| admissible.window(*start, width))
            .map(|(_, w)| measure(w).abs()),
    )
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (count > 0).then(|| sum / count as f64)
}
