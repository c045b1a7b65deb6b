//! args.rs
//! The argument bundle handed to a node's derive step.

use super::descriptor::{Dependency, NodeDescriptor};
use super::error::DeriveError;
use crate::store::{
    Attribute, EventSet, KeyPointValue, KeyTimeInstance, NodeValue, Parameter, Section, ValueKind,
};

/// One slot per declared dependency, in declaration order. Absent inputs are
/// explicit `None`s so a node can always tell "not supplied" from "not
/// declared".
#[derive(Debug, Clone)]
pub struct DeriveArgs<'a> {
    node: &'a str,
    dependencies: &'a [Dependency],
    values: Vec<Option<&'a NodeValue>>,
}

impl<'a> DeriveArgs<'a> {
    /// Fills every declared slot from `lookup`.
    pub fn collect(
        descriptor: &'a NodeDescriptor,
        lookup: impl Fn(&str) -> Option<&'a NodeValue>,
    ) -> Self {
        let values = descriptor.dependencies.iter().map(|d| lookup(&d.name)).collect();
        Self { node: &descriptor.name, dependencies: &descriptor.dependencies, values }
    }

    pub fn node_name(&self) -> &str { self.node }

    /// Names of the supplied arguments, in declaration order.
    pub fn present(&self) -> Vec<&'a str> {
        self.dependencies
            .iter()
            .zip(&self.values)
            .filter(|(_, v)| v.is_some())
            .map(|(d, _)| d.name.as_str())
            .collect()
    }

    pub fn is_present(&self, name: &str) -> bool {
        matches!(self.get(name), Ok(Some(_)))
    }

    pub fn get(&self, name: &str) -> Result<Option<&'a NodeValue>, DeriveError> {
        self.dependencies
            .iter()
            .position(|d| d.name == name)
            .map(|i| self.values[i])
            .ok_or_else(|| DeriveError::UndeclaredArgument {
                node: self.node.to_string(),
                argument: name.to_string(),
            })
    }

    fn typed<T>(
        &self,
        name: &str,
        expected: ValueKind,
        extract: fn(&'a NodeValue) -> Option<&'a T>,
    ) -> Result<Option<&'a T>, DeriveError> {
        match self.get(name)? {
            None => Ok(None),
            Some(value) => extract(value).map(Some).ok_or_else(|| DeriveError::WrongKind {
                node: self.node.to_string(),
                argument: name.to_string(),
                expected,
                found: value.kind(),
            }),
        }
    }

    fn required<T>(&self, name: &str, value: Option<&'a T>) -> Result<&'a T, DeriveError> {
        value.ok_or_else(|| DeriveError::MissingArgument {
            node: self.node.to_string(),
            argument: name.to_string(),
        })
    }

    pub fn opt_parameter(&self, name: &str) -> Result<Option<&'a Parameter>, DeriveError> {
        self.typed(name, ValueKind::Parameter, NodeValue::as_parameter)
    }

    pub fn parameter(&self, name: &str) -> Result<&'a Parameter, DeriveError> {
        self.required(name, self.opt_parameter(name)?)
    }

    pub fn opt_attribute(&self, name: &str) -> Result<Option<&'a Attribute>, DeriveError> {
        self.typed(name, ValueKind::Attribute, NodeValue::as_attribute)
    }

    pub fn attribute(&self, name: &str) -> Result<&'a Attribute, DeriveError> {
        self.required(name, self.opt_attribute(name)?)
    }

    pub fn opt_sections(&self, name: &str) -> Result<Option<&'a EventSet<Section>>, DeriveError> {
        self.typed(name, ValueKind::Sections, NodeValue::as_sections)
    }

    pub fn sections(&self, name: &str) -> Result<&'a EventSet<Section>, DeriveError> {
        self.required(name, self.opt_sections(name)?)
    }

    pub fn opt_key_time_instances(
        &self,
        name: &str,
    ) -> Result<Option<&'a EventSet<KeyTimeInstance>>, DeriveError> {
        self.typed(name, ValueKind::KeyTimeInstances, NodeValue::as_key_time_instances)
    }

    pub fn key_time_instances(&self, name: &str) -> Result<&'a EventSet<KeyTimeInstance>, DeriveError> {
        self.required(name, self.opt_key_time_instances(name)?)
    }

    pub fn opt_key_point_values(
        &self,
        name: &str,
    ) -> Result<Option<&'a EventSet<KeyPointValue>>, DeriveError> {
        self.typed(name, ValueKind::KeyPointValues, NodeValue::as_key_point_values)
    }

    pub fn key_point_values(&self, name: &str) -> Result<&'a EventSet<KeyPointValue>, DeriveError> {
        self.required(name, self.opt_key_point_values(name)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AttributeValue;
    use std::collections::HashMap;

    fn descriptor() -> NodeDescriptor {
        NodeDescriptor::parameter("Heading True")
            .requires("Heading Continuous", ValueKind::Parameter)
            .optional("Magnetic Variation", ValueKind::Parameter)
            .optional("Tail Number", ValueKind::Attribute)
    }

    fn store() -> HashMap<String, NodeValue> {
        let mut values = HashMap::new();
        values.insert(
            "Heading Continuous".to_string(),
            NodeValue::from(Parameter::new("Heading Continuous", vec![1.0, 2.0], 1.0, 0.0)),
        );
        values.insert(
            "Tail Number".to_string(),
            NodeValue::from(Attribute::new("Tail Number", AttributeValue::Text("G-ABCD".into()))),
        );
        values
    }

    #[test]
    fn test_every_declared_slot_is_filled() {
        let d = descriptor();
        let values = store();
        let args = DeriveArgs::collect(&d, |name| values.get(name));
        assert_eq!(args.present(), vec!["Heading Continuous", "Tail Number"]);
        assert_eq!(args.parameter("Heading Continuous").unwrap().len(), 2);
        assert!(args.opt_parameter("Magnetic Variation").unwrap().is_none());
        assert!(!args.is_present("Magnetic Variation"));
    }

    #[test]
    fn test_missing_required_argument_is_descriptive() {
        let d = descriptor();
        let values: HashMap<String, NodeValue> = HashMap::new();
        let args = DeriveArgs::collect(&d, |name| values.get(name));
        let err = args.parameter("Heading Continuous").unwrap_err();
        assert_eq!(
            err,
            DeriveError::MissingArgument {
                node: "Heading True".into(),
                argument: "Heading Continuous".into()
            }
        );
    }

    #[test]
    fn test_undeclared_and_wrong_kind() {
        let d = descriptor();
        let values = store();
        let args = DeriveArgs::collect(&d, |name| values.get(name));
        assert!(matches!(args.get("Airspeed"), Err(DeriveError::UndeclaredArgument { .. })));
        assert!(matches!(
            args.opt_parameter("Tail Number"),
            Err(DeriveError::WrongKind { found: ValueKind::Attribute, .. })
        ));
    }
}
