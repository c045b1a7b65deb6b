//! flight_phases.rs
//! Section nodes.

use crate::node::{DeriveArgs, DeriveError, DerivedNode, NodeDescriptor, NodeOutput};
use crate::store::{EventSet, MaskedArray, Section, ValueKind};

/// Periods where the aircraft is moving faster than taxi speed.
///
/// A section is a maximal run of valid samples above the threshold; masked
/// samples end it.
pub struct Fast {
    /// Knots.
    pub threshold: f64,
}

impl DerivedNode for Fast {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::sections("Fast").requires("Airspeed For Flight Phases", ValueKind::Parameter)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let airspeed = args.parameter("Airspeed For Flight Phases")?;
        let items = runs_where(&airspeed.array, |v| v > self.threshold)
            .into_iter()
            .map(|(start, stop)| Section::new("Fast", start, stop).with_edges(start as f64, stop as f64))
            .collect();
        Ok(NodeOutput::Sections(EventSet::new("Fast", airspeed.frequency, airspeed.offset, items)))
    }
}

/// Half-open `[start, stop)` runs of valid samples satisfying `predicate`.
fn runs_where(array: &MaskedArray, predicate: impl Fn(f64) -> bool) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, sample) in array.iter().enumerate() {
        match (sample.is_some_and(&predicate), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, array.len()));
    }
    runs
}
