//! types.rs
//! Identity and value types shared by the registry, resolver and driver.

use super::events::{EventSet, KeyPointValue, KeyTimeInstance, Section};
use super::parameter::Parameter;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline(always)]
    pub fn index(&self) -> usize { self.0 as usize }
    pub fn new(idx: usize) -> Self { Self(idx as u32) }
}

/// The five kinds of value a node can produce or consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ValueKind {
    Parameter,
    Attribute,
    Sections,
    KeyTimeInstances,
    KeyPointValues,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ValueKind::Parameter => "Parameter",
            ValueKind::Attribute => "Attribute",
            ValueKind::Sections => "Section set",
            ValueKind::KeyTimeInstances => "KTI set",
            ValueKind::KeyPointValues => "KPV set",
        };
        f.write_str(label)
    }
}

/// Unit of measurement tag carried by a parameter (e.g. "kts", "ft", "deg").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Units(pub String);

/// The payload of a flight attribute.
///
/// Structured records (airport or runway descriptions returned by the lookup
/// service, AFR overrides) are kept as JSON so their schema stays owned by the
/// external collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeValue {
    Number(f64),
    Text(String),
    Flag(bool),
    Record(serde_json::Value),
}

impl AttributeValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(v) => Some(*v),
            AttributeValue::Record(v) => v.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Record(v) => v.as_str(),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&serde_json::Value> {
        match self {
            AttributeValue::Record(v) => Some(v),
            _ => None,
        }
    }
}

/// A named scalar or structured value with no time dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttributeValue,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: AttributeValue) -> Self {
        Self { name: name.into(), value }
    }
}

/// Any value held in a flight store, keyed by its name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeValue {
    Parameter(Parameter),
    Attribute(Attribute),
    Sections(EventSet<Section>),
    KeyTimeInstances(EventSet<KeyTimeInstance>),
    KeyPointValues(EventSet<KeyPointValue>),
}

impl NodeValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            NodeValue::Parameter(_) => ValueKind::Parameter,
            NodeValue::Attribute(_) => ValueKind::Attribute,
            NodeValue::Sections(_) => ValueKind::Sections,
            NodeValue::KeyTimeInstances(_) => ValueKind::KeyTimeInstances,
            NodeValue::KeyPointValues(_) => ValueKind::KeyPointValues,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            NodeValue::Parameter(p) => &p.name,
            NodeValue::Attribute(a) => &a.name,
            NodeValue::Sections(s) => &s.name,
            NodeValue::KeyTimeInstances(s) => &s.name,
            NodeValue::KeyPointValues(s) => &s.name,
        }
    }

    pub fn as_parameter(&self) -> Option<&Parameter> {
        match self { NodeValue::Parameter(p) => Some(p), _ => None }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self { NodeValue::Attribute(a) => Some(a), _ => None }
    }

    pub fn as_sections(&self) -> Option<&EventSet<Section>> {
        match self { NodeValue::Sections(s) => Some(s), _ => None }
    }

    pub fn as_key_time_instances(&self) -> Option<&EventSet<KeyTimeInstance>> {
        match self { NodeValue::KeyTimeInstances(s) => Some(s), _ => None }
    }

    pub fn as_key_point_values(&self) -> Option<&EventSet<KeyPointValue>> {
        match self { NodeValue::KeyPointValues(s) => Some(s), _ => None }
    }

    /// Short human-readable shape description used by logs and traces.
    pub fn describe(&self) -> String {
        match self {
            NodeValue::Parameter(p) => format!("{} Hz, {} samples", p.frequency, p.len()),
            NodeValue::Attribute(a) => match &a.value {
                AttributeValue::Number(v) => format!("{:.3}", v),
                AttributeValue::Text(s) => format!("'{}'", s),
                AttributeValue::Flag(b) => b.to_string(),
                AttributeValue::Record(r) => r.to_string(),
            },
            NodeValue::Sections(s) => format!("{} sections", s.items.len()),
            NodeValue::KeyTimeInstances(s) => format!("{} KTIs", s.items.len()),
            NodeValue::KeyPointValues(s) => format!("{} KPVs", s.items.len()),
        }
    }
}

impl From<Parameter> for NodeValue {
    fn from(p: Parameter) -> Self { NodeValue::Parameter(p) }
}

impl From<Attribute> for NodeValue {
    fn from(a: Attribute) -> Self { NodeValue::Attribute(a) }
}

impl From<EventSet<Section>> for NodeValue {
    fn from(s: EventSet<Section>) -> Self { NodeValue::Sections(s) }
}

impl From<EventSet<KeyTimeInstance>> for NodeValue {
    fn from(s: EventSet<KeyTimeInstance>) -> Self { NodeValue::KeyTimeInstances(s) }
}

impl From<EventSet<KeyPointValue>> for NodeValue {
    fn from(s: EventSet<KeyPointValue>) -> Self { NodeValue::KeyPointValues(s) }
}
