//! parameter.rs
//! Time series with sample rate and phase metadata.

use super::masked::MaskedArray;
use super::types::Units;
use serde::{Deserialize, Serialize};

/// Sample rate and phase of a time series, without a name.
///
/// This is what a node's derive step produces for a parameter; the driver
/// attaches the node's name when storing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub array: MaskedArray,
    /// Samples per second.
    pub frequency: f64,
    /// Seconds from the flight time origin to the first sample.
    pub offset: f64,
}

impl Series {
    pub fn new(array: MaskedArray, frequency: f64, offset: f64) -> Self {
        Self { array, frequency, offset }
    }
}

/// A named time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub array: MaskedArray,
    pub frequency: f64,
    pub offset: f64,
    pub units: Option<Units>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, array: impl Into<MaskedArray>, frequency: f64, offset: f64) -> Self {
        Self {
            name: name.into(),
            array: array.into(),
            frequency,
            offset,
            units: None,
        }
    }

    pub fn from_series(name: impl Into<String>, series: Series) -> Self {
        Self::new(name, series.array, series.frequency, series.offset)
    }

    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = Some(Units(units.into()));
        self
    }

    /// Whether `frequency > 0` and `0 <= offset < 1 / frequency`.
    pub fn timing_is_valid(&self) -> bool {
        self.frequency.is_finite()
            && self.frequency > 0.0
            && self.offset >= 0.0
            && self.offset < 1.0 / self.frequency
    }

    #[inline(always)]
    pub fn len(&self) -> usize { self.array.len() }

    pub fn is_empty(&self) -> bool { self.array.is_empty() }

    /// Seconds from the time origin to sample `index` (fractional indices allowed).
    pub fn time_of(&self, index: f64) -> f64 {
        self.offset + index / self.frequency
    }

    /// Fractional sample index at time `seconds`.
    pub fn index_at(&self, seconds: f64) -> f64 {
        (seconds - self.offset) * self.frequency
    }

    /// Recorded duration in seconds.
    pub fn duration(&self) -> f64 {
        self.len() as f64 / self.frequency
    }

    pub fn series(&self) -> Series {
        Series::new(self.array.clone(), self.frequency, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_time_and_index_are_inverse() {
        let p = Parameter::new("Airspeed", vec![0.0; 8], 4.0, 0.125);
        assert_eq!(p.time_of(0.0), 0.125);
        assert_eq!(p.time_of(4.0), 1.125);
        assert!((p.index_at(p.time_of(3.5)) - 3.5).abs() < 1e-12);
        assert_eq!(p.duration(), 2.0);
    }

    #[rstest]
    #[case::one_hertz(1.0, 0.0, true)]
    #[case::phase_within_period(4.0, 0.2, true)]
    #[case::phase_of_a_full_period(4.0, 0.25, false)]
    #[case::negative_offset(1.0, -0.1, false)]
    #[case::zero_frequency(0.0, 0.0, false)]
    #[case::nan_frequency(f64::NAN, 0.0, false)]
    fn test_timing_is_valid(#[case] hz: f64, #[case] offset: f64, #[case] expected: bool) {
        assert_eq!(Parameter::new("Airspeed", vec![0.0; 4], hz, offset).timing_is_valid(), expected);
    }
}
