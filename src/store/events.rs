//! events.rs
//! Discrete, time-indexed values: sections (phases), key time instances and
//! key point values.
//!
//! Indices are sample positions on the grid described by the owning set's
//! `frequency` and `offset`, so they can be moved onto any parameter's grid
//! with [`rebase_index`].

use serde::{Deserialize, Serialize};

/// Converts an index on one (frequency, offset) grid to another.
pub fn rebase_index(index: f64, from_hz: f64, from_offset: f64, to_hz: f64, to_offset: f64) -> f64 {
    ((index / from_hz) + from_offset - to_offset) * to_hz
}

/// A contiguous interval `[start, stop)` representing a flight phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    pub start: usize,
    pub stop: usize,
    /// Fractional boundaries for sub-sample precision.
    pub start_edge: Option<f64>,
    pub stop_edge: Option<f64>,
}

impl Section {
    pub fn new(name: impl Into<String>, start: usize, stop: usize) -> Self {
        Self { name: name.into(), start, stop, start_edge: None, stop_edge: None }
    }

    pub fn with_edges(mut self, start_edge: f64, stop_edge: f64) -> Self {
        self.start_edge = Some(start_edge);
        self.stop_edge = Some(stop_edge);
        self
    }

    pub fn len(&self) -> usize { self.stop.saturating_sub(self.start) }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// A named single time index marking an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyTimeInstance {
    pub name: String,
    pub index: f64,
}

impl KeyTimeInstance {
    pub fn new(name: impl Into<String>, index: f64) -> Self {
        Self { name: name.into(), index }
    }
}

/// A named (index, value) pair extracted from a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyPointValue {
    pub name: String,
    pub index: f64,
    pub value: f64,
}

impl KeyPointValue {
    pub fn new(name: impl Into<String>, index: f64, value: f64) -> Self {
        Self { name: name.into(), index, value }
    }
}

/// An ordered collection of sections, KTIs or KPVs sharing one index grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventSet<T> {
    pub name: String,
    pub frequency: f64,
    pub offset: f64,
    pub items: Vec<T>,
}

impl<T> EventSet<T> {
    pub fn new(name: impl Into<String>, frequency: f64, offset: f64, items: Vec<T>) -> Self {
        Self { name: name.into(), frequency, offset, items }
    }

    pub fn first(&self) -> Option<&T> { self.items.first() }

    pub fn last(&self) -> Option<&T> { self.items.last() }

    pub fn is_empty(&self) -> bool { self.items.is_empty() }

    /// Moves an index from this set's grid onto another grid.
    pub fn index_on(&self, index: f64, frequency: f64, offset: f64) -> f64 {
        rebase_index(index, self.frequency, self.offset, frequency, offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebase_index_between_rates() {
        // 10 s on a 1 Hz grid is 9.5 s past the origin of a 4 Hz grid offset by 0.5 s.
        assert_eq!(rebase_index(10.0, 1.0, 0.0, 4.0, 0.5), 38.0);
        assert_eq!(rebase_index(38.0, 4.0, 0.5, 1.0, 0.0), 10.0);
    }

    #[test]
    fn test_event_set_accessors() {
        let set = EventSet::new(
            "Gross Weight At Liftoff",
            1.0,
            0.0,
            vec![KeyPointValue::new("Gross Weight At Liftoff", 5.0, 135.0),
                 KeyPointValue::new("Gross Weight At Liftoff", 12.0, 120.0)],
        );
        assert_eq!(set.first().map(|k| k.value), Some(135.0));
        assert_eq!(set.last().map(|k| k.value), Some(120.0));
    }
}
