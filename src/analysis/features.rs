use serde::{Deserialize, Serialize};

use crate::error::ClassificationError;

/// Number of measurements in a [`FeatureVector`].
pub const FEATURE_COUNT: usize = 29;

macro_rules! feature_vector {
    ($($(#[$doc:meta])* $field:ident => $name:literal,)*) => {
        /// The 29 acoustic measurements, in model input order.
        ///
        /// Serializes as an object keyed by the names in [`FEATURE_NAMES`].
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        pub struct FeatureVector {
            $(
                $(#[$doc])*
                #[serde(rename = $name)]
                pub $field: f64,
            )*
        }

        /// Feature names in model input order.
        pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [$($name,)*];

        impl FeatureVector {
            /// Values in [`FEATURE_NAMES`] order.
            pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
                [$(self.$field,)*]
            }

            /// Build from values in [`FEATURE_NAMES`] order.
            pub fn from_slice(values: &[f64]) -> Result<Self, ClassificationError> {
                let array: [f64; FEATURE_COUNT] =
                    values
                        .try_into()
                        .map_err(|_| ClassificationError::FeatureCountMismatch {
                            expected: FEATURE_COUNT,
                            actual: values.len(),
                        })?;
                let [$($field,)*] = array;
                Ok(Self { $($field,)* })
            }

            /// Look up a measurement by its name.
            pub fn get(&self, name: &str) -> Option<f64> {
                match name {
                    $($name => Some(self.$field),)*
                    _ => None,
                }
            }
        }
    };
}

feature_vector! {
    /// Detected glottal pulses.
    num_pulses => "numPulses",
    /// Inter-pulse intervals.
    num_periods_pulses => "numPeriodsPulses",
    /// Mean inter-pulse period, seconds.
    mean_period_pulses => "meanPeriodPulses",
    /// Population standard deviation of the inter-pulse periods, seconds.
    std_dev_period_pulses => "stdDevPeriodPulses",
    loc_pct_jitter => "locPctJitter",
    /// Seconds.
    loc_abs_jitter => "locAbsJitter",
    rap_jitter => "rapJitter",
    ppq5_jitter => "ppq5Jitter",
    ddp_jitter => "ddpJitter",
    loc_shimmer => "locShimmer",
    /// Decibels.
    loc_db_shimmer => "locDbShimmer",
    apq3_shimmer => "apq3Shimmer",
    apq5_shimmer => "apq5Shimmer",
    apq11_shimmer => "apq11Shimmer",
    dda_shimmer => "ddaShimmer",
    /// Mean harmonics-to-noise ratio, dB.
    mean_auto_corr_harmonicity => "meanAutoCorrHarmonicity",
    /// `1 / 10^(hnr / 10)`.
    mean_noise_to_harm_harmonicity => "meanNoiseToHarmHarmonicity",
    /// `10^(hnr / 10)`.
    mean_harm_to_noise_harmonicity => "meanHarmToNoiseHarmonicity",
    min_intensity => "minIntensity",
    max_intensity => "maxIntensity",
    /// Energy-averaged, dB.
    mean_intensity => "meanIntensity",
    f1 => "f1",
    f2 => "f2",
    f3 => "f3",
    f4 => "f4",
    /// Bandwidths at the temporal midpoint, Hz.
    b1 => "b1",
    b2 => "b2",
    b3 => "b3",
    b4 => "b4",
}

impl FeatureVector {
    /// Name of the first non-finite measurement, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.to_array()
            .iter()
            .zip(FEATURE_NAMES)
            .find(|(value, _)| !value.is_finite())
            .map(|(_, name)| name)
    }
}
