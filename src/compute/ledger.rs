use crate::node::DeriveError;
use crate::store::{FlightInput, NodeValue, ValueKind};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ComputationError {
    #[error("Node '{node}' failed: {source}")]
    DeriveFailed { node: String, source: DeriveError },
    #[error("Node '{node}' skipped, upstream unavailable: {}", .missing.join(", "))]
    UpstreamUnavailable { node: String, missing: Vec<String> },
    #[error("Node '{node}' produced a {found}, declared as {expected}")]
    KindMismatch { node: String, expected: ValueKind, found: ValueKind },
    #[error("Node '{node}' produced no result")]
    NoResult { node: String },
}

/// The per-flight store: every raw input and every derive outcome, by name.
///
/// Failures are kept next to successes so the audit trace can show why a
/// value is missing. Only `Ok` entries count as available.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    values: BTreeMap<String, Result<NodeValue, ComputationError>>,
}

impl Ledger {
    pub fn new() -> Self { Self::default() }

    /// Seeds the ledger with a flight's recorded values. A later value with a
    /// repeated name replaces the earlier one.
    pub fn from_input(input: FlightInput) -> Self {
        let mut ledger = Self::new();
        for value in input.values {
            ledger.insert(value.name().to_string(), Ok(value));
        }
        ledger
    }

    pub fn get(&self, name: &str) -> Option<&Result<NodeValue, ComputationError>> {
        self.values.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&NodeValue> {
        self.values.get(name)?.as_ref().ok()
    }

    pub fn is_available(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    pub fn insert(&mut self, name: String, value: Result<NodeValue, ComputationError>) {
        self.values.insert(name, value);
    }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Result<NodeValue, ComputationError>)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Successful entries only.
    pub fn available(&self) -> impl Iterator<Item = (&str, &NodeValue)> + '_ {
        self.values.iter().filter_map(|(k, v)| v.as_ref().ok().map(|v| (k.as_str(), v)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ComputationError)> + '_ {
        self.values.iter().filter_map(|(k, v)| v.as_ref().err().map(|e| (k.as_str(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{AttributeValue, Parameter};

    #[test]
    fn test_failures_are_not_available() {
        let input = FlightInput::new("flight")
            .with_parameter(Parameter::new("Airspeed", vec![100.0], 1.0, 0.0))
            .with_attribute("Tail Number", AttributeValue::Text("G-ABCD".into()));
        let mut ledger = Ledger::from_input(input);
        ledger.insert("Fast".into(), Err(ComputationError::NoResult { node: "Fast".into() }));

        assert_eq!(ledger.len(), 3);
        assert!(ledger.is_available("Airspeed"));
        assert!(!ledger.is_available("Fast"));
        assert!(ledger.get("Fast").is_some());
        assert_eq!(ledger.available().count(), 2);
        assert_eq!(ledger.failures().map(|(n, _)| n).collect::<Vec<_>>(), vec!["Fast"]);
    }
}
