use super::super::params::PerturbationParams;
use super::{Admissible, PeriodBounds, mean_abs_over_windows};

/// Period perturbation measures; relative values are fractions of the mean period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Jitter {
    pub(crate) local: f64,
    pub(crate) local_absolute: f64,
    pub(crate) rap: f64,
    pub(crate) ppq5: f64,
    pub(crate) ddp: f64,
}

/// Compute every jitter measure, reporting the first undefined one by name.
pub(crate) fn jitter(periods: &[f64], params: &PerturbationParams) -> Result<Jitter, &'static str> {
    let bounds = PeriodBounds::from(params);
    let mean_period = bounds.mean_valid(periods).ok_or("meanPeriodPulses")?;
    let admissible = Admissible::for_periods(periods, &bounds);

    let local_absolute =
        mean_abs_over_windows(periods, 2, &admissible, |w| w[1] - w[0]).ok_or("locAbsJitter")?;
    let rap = mean_abs_over_windows(periods, 3, &admissible, |w| {
        w[1] - (w[0] + w[1] + w[2]) / 3.0
    })
    .ok_or("rapJitter")?;
    let ppq5 = mean_abs_over_windows(periods, 5, &admissible, |w| {
        w[2] - w.iter().sum::<f64>() / 5.0
    })
    .ok_or("ppq5Jitter")?;
    let ddp = mean_abs_over_windows(periods, 3, &admissible, |w| {
        (w[2] - w[1]) - (w[1] - w[0])
    })
    .ok_or("ddpJitter")?;

    Ok(Jitter {
        local: local_absolute / mean_period,
        local_absolute,
        rap: rap / mean_period,
        ppq5: ppq5 / mean_period,
        ddp: ddp / mean_period,
    })
}
