//! repair.rs
//! Gap filling for masked samples.

use crate::store::MaskedArray;

/// Fills masked runs by linear interpolation between the valid samples on
/// either side.
///
/// Interior gaps longer than `max_gap` samples are left masked. Leading and
/// trailing gaps have only one neighbour; they are filled by holding the edge
/// value when `extrapolate` is set and left masked otherwise. A fully masked
/// array is returned unchanged.
pub fn repair_mask(array: &MaskedArray, max_gap: Option<usize>, extrapolate: bool) -> MaskedArray {
    let mut repaired = array.clone();
    let valid: Vec<usize> = array.valid_indices().collect();
    let (Some(&first), Some(&last)) = (valid.first(), valid.last()) else {
        return repaired;
    };

    // 1. Interior gaps
    for pair in valid.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        let gap = hi - lo - 1;
        if gap == 0 || max_gap.is_some_and(|limit| gap > limit) {
            continue;
        }
        let a = array.value(lo);
        let b = array.value(hi);
        let span = (hi - lo) as f64;
        for i in lo + 1..hi {
            repaired.set(i, a + (b - a) * (i - lo) as f64 / span);
        }
    }

    // 2. Edges
    if extrapolate {
        let head = array.value(first);
        for i in 0..first {
            repaired.set(i, head);
        }
        let tail = array.value(last);
        for i in last + 1..array.len() {
            repaired.set(i, tail);
        }
    }
    repaired
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(arr: &MaskedArray) -> Vec<Option<f64>> {
        arr.iter().collect()
    }

    #[test]
    fn test_repair_interpolates_interior_gap() {
        let arr = MaskedArray::with_mask(vec![0.0, 0.0, 0.0, 6.0], [false, true, true, false]);
        let out = repair_mask(&arr, None, false);
        assert_eq!(samples(&out), vec![Some(0.0), Some(2.0), Some(4.0), Some(6.0)]);
    }

    #[test]
    fn test_repair_respects_max_gap() {
        let arr = MaskedArray::with_mask(
            vec![1.0, 0.0, 0.0, 0.0, 5.0, 0.0, 7.0],
            [false, true, true, true, false, true, false],
        );
        let out = repair_mask(&arr, Some(2), false);
        assert_eq!(
            samples(&out),
            vec![Some(1.0), None, None, None, Some(5.0), Some(6.0), Some(7.0)]
        );
    }

    #[test]
    fn test_repair_edges_only_when_extrapolating() {
        let arr = MaskedArray::with_mask(vec![0.0, 3.0, 4.0, 0.0], [true, false, false, true]);
        assert_eq!(samples(&repair_mask(&arr, None, false)), vec![None, Some(3.0), Some(4.0), None]);
        assert_eq!(
            samples(&repair_mask(&arr, None, true)),
            vec![Some(3.0), Some(3.0), Some(4.0), Some(4.0)]
        );
    }

    #[test]
    fn test_repair_fully_masked_is_unchanged() {
        let arr = MaskedArray::masked(3);
        assert!(repair_mask(&arr, None, true).all_masked());
    }
}
