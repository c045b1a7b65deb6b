//! Signal primitives shared by every derivation node.
//!
//! All functions are stateless and frequency/offset aware, and every one of
//! them states how masked samples propagate. Fully masked input never raises;
//! it produces a fully masked output of the correct length. Frequency or shape
//! mismatches that alignment cannot resolve are usage errors.
pub mod align;
pub mod filters;
pub mod heading;
pub mod merge;
pub mod repair;

pub use align::{align, align_to_grid, value_at};
pub use filters::{first_order_lag, hysteresis, integrate, rate_of_change};
pub use heading::{straighten_headings, wrap_heading};
pub use merge::{blend_two_parameters, combine_aligned, interleave, mean_of_aligned};
pub use repair::repair_mask;

use crate::store::Parameter;
use thiserror::Error;

/// Tolerance used when comparing sample rates and fractional indices.
pub(crate) const TOLERANCE: f64 = 1e-6;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LibraryError {
    #[error("Parameter '{name}' has invalid frequency {frequency}")]
    InvalidFrequency { name: String, frequency: f64 },
    #[error("Frequency mismatch: '{first}' at {first_hz} Hz vs '{second}' at {second_hz} Hz")]
    FrequencyMismatch { first: String, first_hz: f64, second: String, second_hz: f64 },
    #[error("Length mismatch: '{first}' has {first_len} samples, '{second}' has {second_len}")]
    LengthMismatch { first: String, first_len: usize, second: String, second_len: usize },
    #[error("Window of {width} s is too narrow at {frequency} Hz")]
    WindowTooNarrow { width: f64, frequency: f64 },
    #[error("Time constant {time_constant} s is too small at {frequency} Hz")]
    TimeConstantTooSmall { time_constant: f64, frequency: f64 },
    #[error("No parameters supplied")]
    NoParameters,
}

pub(crate) fn check_frequency(param: &Parameter) -> Result<(), LibraryError> {
    if param.frequency.is_finite() && param.frequency > 0.0 {
        Ok(())
    } else {
        Err(LibraryError::InvalidFrequency { name: param.name.clone(), frequency: param.frequency })
    }
}

pub(crate) fn check_same_frequency(first: &Parameter, second: &Parameter) -> Result<(), LibraryError> {
    check_frequency(first)?;
    check_frequency(second)?;
    if (first.frequency - second.frequency).abs() > TOLERANCE {
        return Err(LibraryError::FrequencyMismatch {
            first: first.name.clone(),
            first_hz: first.frequency,
            second: second.name.clone(),
            second_hz: second.frequency,
        });
    }
    Ok(())
}
