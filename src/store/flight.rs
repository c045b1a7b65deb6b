//! flight.rs
//! The read-only input of a single flight: raw recorder parameters, flight
//! attributes and anything seeded by upstream producers.

use super::events::{EventSet, KeyPointValue, KeyTimeInstance, Section};
use super::parameter::Parameter;
use super::types::{Attribute, AttributeValue, NodeValue};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightInput {
    /// Identifier used in logs and results (e.g. the source file name).
    pub id: String,
    pub values: Vec<NodeValue>,
}

impl FlightInput {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), values: Vec::new() }
    }

    /// Adds a raw parameter. One whose frequency or offset breaks
    /// `0 <= offset < 1 / frequency` is logged and left out.
    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        if !parameter.timing_is_valid() {
            warn!(
                flight = %self.id,
                parameter = %parameter.name,
                frequency = parameter.frequency,
                offset = parameter.offset,
                "Parameter timing out of range, ignored"
            );
            return self;
        }
        self.values.push(NodeValue::Parameter(parameter));
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.values.push(NodeValue::Attribute(Attribute::new(name, value)));
        self
    }

    pub fn with_sections(mut self, sections: EventSet<Section>) -> Self {
        self.values.push(NodeValue::Sections(sections));
        self
    }

    pub fn with_key_time_instances(mut self, ktis: EventSet<KeyTimeInstance>) -> Self {
        self.values.push(NodeValue::KeyTimeInstances(ktis));
        self
    }

    pub fn with_key_point_values(mut self, kpvs: EventSet<KeyPointValue>) -> Self {
        self.values.push(NodeValue::KeyPointValues(kpvs));
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.iter().map(NodeValue::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_with_bad_timing_is_left_out() {
        let input = FlightInput::new("flight")
            .with_parameter(Parameter::new("Airspeed", vec![100.0], 1.0, 0.0))
            .with_parameter(Parameter::new("Altitude STD", vec![0.0], 4.0, 0.5))
            .with_parameter(Parameter::new("Pitch", vec![0.0], 0.0, 0.0));
        assert_eq!(input.names().collect::<Vec<_>>(), vec!["Airspeed"]);
    }
}
