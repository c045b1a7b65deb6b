//! filters.rs
//! Hysteresis, differentiation, integration and first-order lag.

use super::repair::repair_mask;
use super::{check_frequency, LibraryError};
use crate::store::{MaskedArray, Parameter};

/// Suppresses oscillation smaller than `band`.
///
/// The registered value only changes when a valid sample falls outside
/// `registered ± band / 2`, and then it jumps to that sample. Masked samples
/// stay masked and never move the registered value. Re-applying with the same
/// band returns the same array.
pub fn hysteresis(array: &MaskedArray, band: f64) -> MaskedArray {
    let half = band.abs() / 2.0;
    let mut registered: Option<f64> = None;
    array
        .iter()
        .map(|sample| {
            let value = sample?;
            let next = match registered {
                Some(r) if (value - r).abs() <= half => r,
                _ => value,
            };
            registered = Some(next);
            Some(next)
        })
        .collect()
}

/// Rate of change per second over a centred window of `width` seconds.
///
/// The half window is `floor(width * frequency / 2)` samples. Near the edges
/// the widest window that still fits inside the array is used, so valid edge
/// samples yield valid slopes. A sample is masked when it, or either end of
/// its window, is masked.
pub fn rate_of_change(param: &Parameter, width: f64) -> Result<MaskedArray, LibraryError> {
    check_frequency(param)?;
    let half_width = (width * param.frequency / 2.0).floor();
    if !(half_width >= 1.0) {
        return Err(LibraryError::WindowTooNarrow { width, frequency: param.frequency });
    }
    let array = &param.array;
    let len = array.len();
    // Any window wider than the array reads the same samples.
    let half_width = half_width.min(len as f64) as usize;

    Ok((0..len)
        .map(|i| {
            array.get(i)?;
            let lo = i.saturating_sub(half_width);
            let hi = i.saturating_add(half_width).min(len - 1);
            if hi == lo {
                return Some(0.0);
            }
            let a = array.get(lo)?;
            let b = array.get(hi)?;
            Some((b - a) * param.frequency / (hi - lo) as f64)
        })
        .collect())
}

/// Cumulative trapezoidal integral, `scale`d and starting at `initial`.
///
/// Masked samples are repaired by interpolation (and edge hold) before
/// integrating so a gap never zeroes the remainder of the integral. The
/// output is fully valid unless the input has no valid samples at all.
pub fn integrate(
    array: &MaskedArray,
    frequency: f64,
    scale: f64,
    initial: f64,
) -> Result<MaskedArray, LibraryError> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(LibraryError::InvalidFrequency { name: "integrand".into(), frequency });
    }
    if array.all_masked() {
        return Ok(MaskedArray::masked(array.len()));
    }

    let repaired = repair_mask(array, None, true);
    let data = repaired.data();
    let k = scale * 0.5 / frequency;
    let mut total = initial;
    let mut result = Vec::with_capacity(data.len());
    for (i, &x) in data.iter().enumerate() {
        if i > 0 {
            total += k * (x + data[i - 1]);
        }
        result.push(total);
    }
    Ok(MaskedArray::new(result))
}

/// First-order lag filter (bilinear transform of `gain / (1 + tc·s)`).
///
/// The filter starts in steady state at `initial`, or at the first valid
/// sample when no initial value is given. Masked samples are repaired before
/// filtering and the input mask is carried to the output.
pub fn first_order_lag(
    array: &MaskedArray,
    time_constant: f64,
    frequency: f64,
    gain: f64,
    initial: Option<f64>,
) -> Result<MaskedArray, LibraryError> {
    let tc = time_constant * frequency;
    // Below half a sample the discrete filter is unstable.
    if !(tc >= 0.5) {
        return Err(LibraryError::TimeConstantTooSmall { time_constant, frequency });
    }
    let Some((_, first)) = array.first_valid() else {
        return Ok(MaskedArray::masked(array.len()));
    };

    let repaired = repair_mask(array, None, true);
    let b = gain / (1.0 + 2.0 * tc);
    let a = (1.0 - 2.0 * tc) / (1.0 + 2.0 * tc);
    let start = initial.unwrap_or(first);
    let mut x_prev = start;
    let mut y_prev = start * gain;

    let filtered: Vec<f64> = repaired
        .data()
        .iter()
        .map(|&x| {
            let y = b * (x + x_prev) - a * y_prev;
            x_prev = x;
            y_prev = y;
            y
        })
        .collect();
    Ok(MaskedArray::with_mask(filtered, array.mask().iter().by_vals()))
}
