//! align.rs
//! Resampling between sample rates and phase offsets.

use super::{check_frequency, LibraryError, TOLERANCE};
use crate::store::{MaskedArray, Parameter};

/// Resamples `source` onto `target`'s frequency and offset.
///
/// Source samples are placed at their true timestamps and linearly
/// interpolated; outside the source's time span the edge sample is held. An
/// output sample is masked when any source sample in its interpolation window
/// is masked. The output always has `target.len()` samples.
pub fn align(source: &Parameter, target: &Parameter) -> Result<MaskedArray, LibraryError> {
    check_frequency(target)?;
    align_to_grid(source, target.frequency, target.offset, target.len())
}

/// Resamples `source` onto an arbitrary grid of `len` samples.
pub fn align_to_grid(
    source: &Parameter,
    frequency: f64,
    offset: f64,
    len: usize,
) -> Result<MaskedArray, LibraryError> {
    check_frequency(source)?;
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(LibraryError::InvalidFrequency { name: "alignment target".into(), frequency });
    }
    if source.array.all_masked() {
        return Ok(MaskedArray::masked(len));
    }

    let ratio = source.frequency / frequency;
    let shift = (offset - source.offset) * source.frequency;

    Ok((0..len)
        .map(|j| value_at(&source.array, j as f64 * ratio + shift))
        .collect())
}

/// Reads `array` at a fractional index.
///
/// Positions within [`TOLERANCE`] of a sample read that sample alone;
/// positions before the first or after the last sample hold the edge sample.
pub fn value_at(array: &MaskedArray, position: f64) -> Option<f64> {
    let len = array.len();
    if len == 0 || position.is_nan() {
        return None;
    }
    let last = len - 1;
    if position <= 0.0 {
        return array.get(0);
    }
    if position >= last as f64 {
        return array.get(last);
    }

    let lower = position.floor();
    let frac = position - lower;
    let i = lower as usize;
    if frac < TOLERANCE {
        return array.get(i);
    }
    if 1.0 - frac < TOLERANCE {
        return array.get(i + 1);
    }
    let a = array.get(i)?;
    let b = array.get(i + 1)?;
    Some(a + (b - a) * frac)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn samples(arr: &MaskedArray) -> Vec<Option<f64>> {
        arr.iter().collect()
    }

    #[test]
    fn test_align_to_self_is_identity() {
        let p = Parameter::new(
            "Altitude STD",
            MaskedArray::with_mask(vec![1.0, 2.0, 4.0, 8.0, 16.0], [false, false, true, false, false]),
            2.0,
            0.25,
        );
        let aligned = align(&p, &p).unwrap();
        assert_eq!(aligned.len(), p.len());
        assert_eq!(samples(&aligned), samples(&p.array));
    }

    #[test]
    fn test_align_upsamples_with_interpolation() {
        let slow = Parameter::new("Slow", vec![0.0, 10.0, 20.0], 1.0, 0.0);
        let fast = Parameter::new("Fast", vec![0.0; 6], 2.0, 0.0);
        let aligned = align(&slow, &fast).unwrap();
        assert_eq!(
            samples(&aligned),
            vec![Some(0.0), Some(5.0), Some(10.0), Some(15.0), Some(20.0), Some(20.0)]
        );
    }

    #[test]
    fn test_align_respects_phase_offset() {
        // Source sampled at 0.5 s past each second; target on the whole second.
        let source = Parameter::new("Source", vec![10.0, 20.0, 30.0], 1.0, 0.5);
        let target = Parameter::new("Target", vec![0.0; 3], 1.0, 0.0);
        let aligned = align(&source, &target).unwrap();
        assert_eq!(samples(&aligned), vec![Some(10.0), Some(15.0), Some(25.0)]);
    }

    #[test]
    fn test_align_downsamples() {
        let fast = Parameter::new("Fast", (0..8).map(f64::from).collect::<Vec<_>>(), 4.0, 0.0);
        let slow = Parameter::new("Slow", vec![0.0; 2], 1.0, 0.0);
        let aligned = align(&fast, &slow).unwrap();
        assert_eq!(samples(&aligned), vec![Some(0.0), Some(4.0)]);
    }

    #[test]
    fn test_masked_sample_poisons_its_window_only() {
        let source = Parameter::new(
            "Source",
            MaskedArray::with_mask(vec![0.0, 1.0, 2.0, 3.0], [false, true, false, false]),
            1.0,
            0.0,
        );
        let target = Parameter::new("Target", vec![0.0; 8], 2.0, 0.0);
        let aligned = align(&source, &target).unwrap();
        assert_eq!(
            samples(&aligned),
            vec![Some(0.0), None, None, None, Some(2.0), Some(2.5), Some(3.0), Some(3.0)]
        );
    }

    #[rstest]
    #[case(1.0, 0.0, 10)]
    #[case(4.0, 0.1, 37)]
    #[case(0.25, 0.0, 3)]
    fn test_align_output_length_matches_target(#[case] hz: f64, #[case] offset: f64, #[case] len: usize) {
        let source = Parameter::new("Source", vec![1.0, 2.0, 3.0, 4.0, 5.0], 1.0, 0.5);
        let target = Parameter::new("Target", vec![0.0; len], hz, offset);
        assert_eq!(align(&source, &target).unwrap().len(), len);
    }

    #[test]
    fn test_fully_masked_source_gives_fully_masked_output() {
        let source = Parameter::new("Source", MaskedArray::masked(4), 1.0, 0.0);
        let target = Parameter::new("Target", vec![0.0; 9], 2.0, 0.0);
        let aligned = align(&source, &target).unwrap();
        assert_eq!(aligned.len(), 9);
        assert!(aligned.all_masked());
    }

    #[test]
    fn test_invalid_frequency_is_a_usage_error() {
        let source = Parameter::new("Source", vec![1.0], 0.0, 0.0);
        let target = Parameter::new("Target", vec![0.0], 1.0, 0.0);
        assert!(matches!(align(&source, &target), Err(LibraryError::InvalidFrequency { .. })));
    }
}
