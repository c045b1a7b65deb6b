//! heading.rs
//! Conversion between wrapped (0..360) and continuous headings.

use crate::store::MaskedArray;

/// Removes the 360° wrap from a heading signal.
///
/// Each step between consecutive valid samples is reduced to the shortest
/// turn, so a change from 359° to 1° becomes +2° rather than -358°. Masked
/// samples stay masked and are skipped when computing the next step. The
/// first valid sample keeps its original value.
///
/// Wrapping the result with [`wrap_heading`] gives back the input exactly for
/// whole-degree headings and up to floating-point rounding otherwise.
pub fn straighten_headings(array: &MaskedArray) -> MaskedArray {
    let mut previous: Option<(f64, f64)> = None;
    array
        .iter()
        .map(|sample| {
            let raw = sample?;
            let straight = match previous {
                None => raw,
                Some((prev_raw, prev_straight)) => {
                    let diff = raw - prev_raw;
                    prev_straight + diff - 360.0 * (diff / 180.0).trunc()
                }
            };
            previous = Some((raw, straight));
            Some(straight)
        })
        .collect()
}

/// Wraps every valid sample into `[0, 360)`.
pub fn wrap_heading(array: &MaskedArray) -> MaskedArray {
    array.map(|h| h.rem_euclid(360.0))
}
