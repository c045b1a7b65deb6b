//! masked.rs
//! Sample values with an explicit, parallel validity mask.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

/// A sequence of samples, each independently markable as invalid.
///
/// `data` and `mask` always have the same length. A set bit in `mask` marks
/// the sample at that position as masked; the numeric value underneath is
/// kept but must not be trusted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MaskedArray {
    data: Vec<f64>,
    mask: BitVec<usize, Lsb0>,
}

impl MaskedArray {
    /// Wraps fully valid data.
    pub fn new(data: Vec<f64>) -> Self {
        let mask = bitvec![usize, Lsb0; 0; data.len()];
        Self { data, mask }
    }

    /// Wraps data with a mask. The mask is padded with `false` or truncated
    /// to the data length.
    pub fn with_mask(data: Vec<f64>, mask: impl IntoIterator<Item = bool>) -> Self {
        let mut bits: BitVec<usize, Lsb0> = mask.into_iter().collect();
        bits.resize(data.len(), false);
        Self { data, mask: bits }
    }

    /// A fully masked array of `len` samples.
    pub fn masked(len: usize) -> Self {
        Self {
            data: vec![0.0; len],
            mask: bitvec![usize, Lsb0; 1; len],
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize { self.data.len() }

    pub fn is_empty(&self) -> bool { self.data.is_empty() }

    /// Raw sample values, including those under the mask.
    pub fn data(&self) -> &[f64] { &self.data }

    pub fn mask(&self) -> &BitSlice<usize, Lsb0> { &self.mask }

    /// The raw value at `i`, ignoring the mask.
    #[inline(always)]
    pub fn value(&self, i: usize) -> f64 { self.data[i] }

    /// The value at `i` if it exists and is valid.
    #[inline(always)]
    pub fn get(&self, i: usize) -> Option<f64> {
        match self.mask.get(i) {
            Some(bit) if !*bit => Some(self.data[i]),
            _ => None,
        }
    }

    pub fn is_masked(&self, i: usize) -> bool {
        self.mask.get(i).map_or(true, |bit| *bit)
    }

    /// Stores a valid value at `i`.
    pub fn set(&mut self, i: usize, value: f64) {
        self.data[i] = value;
        self.mask.set(i, false);
    }

    pub fn set_masked(&mut self, i: usize, masked: bool) {
        self.mask.set(i, masked);
    }

    pub fn push(&mut self, sample: Option<f64>) {
        self.data.push(sample.unwrap_or(0.0));
        self.mask.push(sample.is_none());
    }

    pub fn count_valid(&self) -> usize { self.mask.count_zeros() }

    pub fn all_masked(&self) -> bool { self.mask.all() }

    /// Iterates samples as `Some(value)` or `None` when masked.
    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.data.iter().zip(self.mask.iter()).map(|(v, m)| if *m { None } else { Some(*v) })
    }

    /// Positions of all valid samples, ascending.
    pub fn valid_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.mask.iter_zeros()
    }

    pub fn first_valid(&self) -> Option<(usize, f64)> {
        self.mask.first_zero().map(|i| (i, self.data[i]))
    }

    pub fn last_valid(&self) -> Option<(usize, f64)> {
        self.mask.last_zero().map(|i| (i, self.data[i]))
    }

    /// Applies `f` to every valid sample; masked samples stay masked.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            data: self.data.iter().map(|v| f(*v)).collect(),
            mask: self.mask.clone(),
        }
    }

    /// Element-wise combination of two equal-length arrays; a sample is
    /// masked where either input is masked.
    pub fn zip_with(&self, other: &Self, f: impl Fn(f64, f64) -> f64) -> Self {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| Some(f(a?, b?)))
            .collect()
    }
}

impl FromIterator<Option<f64>> for MaskedArray {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        let mut array = MaskedArray::default();
        for sample in iter {
            array.push(sample);
        }
        array
    }
}

impl From<Vec<f64>> for MaskedArray {
    fn from(data: Vec<f64>) -> Self { MaskedArray::new(data) }
}
