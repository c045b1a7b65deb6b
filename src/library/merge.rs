//! merge.rs
//! Combining several sensors of the same quantity into one series.

use super::align::{align, align_to_grid};
use super::{check_frequency, check_same_frequency, LibraryError};
use crate::store::{MaskedArray, Parameter, Series};

/// Interleaves two equally sampled sensors into one series at twice the rate.
///
/// The sensor with the earlier offset supplies the even samples. Each output
/// sample keeps the mask of the source sample it came from.
///
/// Offsets are taken as given. The output timing assumes the sensors sit half
/// a period apart; for pairs that do not, use [`blend_two_parameters`].
pub fn interleave(first: &Parameter, second: &Parameter) -> Result<Series, LibraryError> {
    check_same_frequency(first, second)?;
    if first.len() != second.len() {
        return Err(LibraryError::LengthMismatch {
            first: first.name.clone(),
            first_len: first.len(),
            second: second.name.clone(),
            second_len: second.len(),
        });
    }
    let (early, late) = if first.offset <= second.offset { (first, second) } else { (second, first) };

    let array: MaskedArray = early
        .array
        .iter()
        .zip(late.array.iter())
        .flat_map(|(a, b)| [a, b])
        .collect();
    Ok(Series::new(array, early.frequency * 2.0, early.offset))
}

/// Blends two equally sampled sensors into one series at twice the rate.
///
/// Both sensors are aligned onto a grid at twice their frequency starting at
/// the earlier offset, then averaged sample by sample. Offsets need not be
/// exactly half a period apart. A sample is masked where either aligned
/// sensor is masked.
pub fn blend_two_parameters(first: &Parameter, second: &Parameter) -> Result<Series, LibraryError> {
    check_same_frequency(first, second)?;
    let frequency = first.frequency * 2.0;
    let offset = first.offset.min(second.offset);
    let len = first.len() + second.len();

    let a = align_to_grid(first, frequency, offset, len)?;
    let b = align_to_grid(second, frequency, offset, len)?;
    Ok(Series::new(a.zip_with(&b, |x, y| (x + y) / 2.0), frequency, offset))
}

/// Aligns every parameter onto the first and reduces the valid samples at
/// each position with `reduce`.
///
/// A sample is masked only where every input is masked, so a single failed
/// sensor never hides the others.
pub fn combine_aligned(
    params: &[&Parameter],
    reduce: impl Fn(&[f64]) -> f64,
) -> Result<Series, LibraryError> {
    let (base, _) = params.split_first().ok_or(LibraryError::NoParameters)?;
    check_frequency(base)?;

    let aligned = params
        .iter()
        .map(|p| align(p, base))
        .collect::<Result<Vec<_>, _>>()?;

    let mut values = Vec::with_capacity(aligned.len());
    let array: MaskedArray = (0..base.len())
        .map(|i| {
            values.clear();
            values.extend(aligned.iter().filter_map(|a| a.get(i)));
            if values.is_empty() { None } else { Some(reduce(&values)) }
        })
        .collect();
    Ok(Series::new(array, base.frequency, base.offset))
}

/// Sample-wise mean of the valid inputs; see [`combine_aligned`].
pub fn mean_of_aligned(params: &[&Parameter]) -> Result<Series, LibraryError> {
    combine_aligned(params, |v| v.iter().sum::<f64>() / v.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(arr: &MaskedArray) -> Vec<Option<f64>> {
        arr.iter().collect()
    }

    fn ramp(name: &str, start: f64, len: usize, hz: f64, offset: f64) -> Parameter {
        Parameter::new(name, (0..len).map(|i| start + i as f64).collect::<Vec<_>>(), hz, offset)
    }

    #[test]
    fn test_interleave_orders_by_offset() {
        let late = Parameter::new("Pitch (2)", vec![10.0, 11.0, 12.0], 1.0, 0.6);
        let early = Parameter::new("Pitch (1)", vec![0.0, 1.0, 2.0], 1.0, 0.1);
        let series = interleave(&late, &early).unwrap();
        assert_eq!(series.array.data(), &[0.0, 10.0, 1.0, 11.0, 2.0, 12.0]);
        assert_eq!(series.frequency, 2.0);
        assert_eq!(series.offset, 0.1);
    }

    #[test]
    fn test_interleave_keeps_source_masks() {
        let a = Parameter::new("A", MaskedArray::with_mask(vec![1.0, 2.0], [false, true]), 4.0, 0.0);
        let b = Parameter::new("B", vec![5.0, 6.0], 4.0, 0.125);
        let series = interleave(&a, &b).unwrap();
        assert_eq!(samples(&series.array), vec![Some(1.0), Some(5.0), None, Some(6.0)]);
    }

    #[test]
    fn test_interleave_takes_offsets_as_given() {
        let a = Parameter::new("A", vec![1.0, 2.0], 1.0, 0.0);
        let b = Parameter::new("B", vec![3.0, 4.0], 1.0, 0.3);
        let series = interleave(&a, &b).unwrap();
        assert_eq!(series.array.data(), &[1.0, 3.0, 2.0, 4.0]);
        assert_eq!(series.offset, 0.0);
        assert_eq!(series.frequency, 2.0);
    }

    #[test]
    fn test_interleave_rejects_mismatched_shapes() {
        let a = ramp("A", 0.0, 4, 1.0, 0.0);
        assert!(matches!(
            interleave(&a, &ramp("B", 0.0, 4, 2.0, 0.5)),
            Err(LibraryError::FrequencyMismatch { .. })
        ));
        assert!(matches!(
            interleave(&a, &ramp("B", 0.0, 5, 1.0, 0.5)),
            Err(LibraryError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn test_blend_two_pitch_sensors() {
        let series = blend_two_parameters(
            &ramp("Pitch (1)", 0.0, 5, 1.0, 0.1),
            &ramp("Pitch (2)", 10.0, 5, 1.0, 0.6),
        )
        .unwrap();
        assert_eq!(
            series.array.data(),
            &[5.0, 5.25, 5.75, 6.25, 6.75, 7.25, 7.75, 8.25, 8.75, 9.0]
        );
        assert_eq!(series.frequency, 2.0);
        assert_eq!(series.offset, 0.1);
    }

    #[test]
    fn test_blend_tolerates_uneven_offsets() {
        let series = blend_two_parameters(
            &ramp("Pitch (1)", 0.0, 5, 1.0, 0.11),
            &ramp("Pitch (2)", 0.0, 5, 1.0, 0.6),
        )
        .unwrap();
        assert_eq!(series.array.len(), 10);
    }

    #[test]
    fn test_blend_rejects_different_rates() {
        let result = blend_two_parameters(
            &ramp("Pitch (1)", 0.0, 5, 2.0, 0.1),
            &ramp("Pitch (2)", 10.0, 10, 4.0, 0.6),
        );
        assert!(matches!(result, Err(LibraryError::FrequencyMismatch { .. })));
    }

    #[test]
    fn test_mean_uses_available_engines() {
        let a = Parameter::new(
            "Eng (1) N1",
            MaskedArray::with_mask((0..10).map(f64::from).collect(), [true]),
            1.0,
            0.0,
        );
        let mut b_mask = vec![false; 10];
        b_mask[0] = true;
        b_mask[9] = true;
        let b = Parameter::new(
            "Eng (2) N1",
            MaskedArray::with_mask((10..20).map(f64::from).collect(), b_mask),
            1.0,
            0.0,
        );
        let series = mean_of_aligned(&[&a, &b]).unwrap();
        let mut expected = vec![None];
        expected.extend((6..14).map(|v| Some(f64::from(v))));
        expected.push(Some(9.0));
        assert_eq!(samples(&series.array), expected);
    }

    #[test]
    fn test_combine_aligned_max() {
        let a = Parameter::new("Eng (1) N1", vec![50.0, 60.0, 70.0], 1.0, 0.0);
        let b = Parameter::new("Eng (2) N1", vec![55.0, 58.0, 75.0], 1.0, 0.0);
        let series = combine_aligned(&[&a, &b], |v| v.iter().copied().fold(f64::MIN, f64::max)).unwrap();
        assert_eq!(series.array.data(), &[55.0, 60.0, 75.0]);
    }

    #[test]
    fn test_combine_aligned_requires_input() {
        assert!(matches!(mean_of_aligned(&[]), Err(LibraryError::NoParameters)));
    }
}
