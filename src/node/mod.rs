//! The node contract: a declarative descriptor plus a pure derive step.
//!
//! Every derived value in a flight (parameter, attribute, section set, KTI
//! set or KPV set) is produced by exactly one registered [`DerivedNode`].
//! Nodes never see the flight store directly; the driver hands them a
//! [`DeriveArgs`] holding one slot per declared dependency.
pub mod args;
pub mod descriptor;
pub mod error;

pub use args::DeriveArgs;
pub use descriptor::{Combination, Dependency, Feasibility, NodeDescriptor, MAX_DEPENDENCIES};
pub use error::DeriveError;

use crate::store::{
    Attribute, AttributeValue, EventSet, KeyPointValue, KeyTimeInstance, NodeValue, Parameter,
    Section, Series, ValueKind,
};

pub trait DerivedNode: Send + Sync {
    fn descriptor(&self) -> NodeDescriptor;

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError>;
}

/// What a derive step returns. The driver names it after the node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeOutput {
    Parameter(Series),
    Attribute(AttributeValue),
    Sections(EventSet<Section>),
    KeyTimeInstances(EventSet<KeyTimeInstance>),
    KeyPointValues(EventSet<KeyPointValue>),
    /// The inputs were valid but there is nothing to report; the node's name
    /// stays unavailable.
    Nothing,
}

impl NodeOutput {
    pub fn kind(&self) -> Option<ValueKind> {
        match self {
            NodeOutput::Parameter(_) => Some(ValueKind::Parameter),
            NodeOutput::Attribute(_) => Some(ValueKind::Attribute),
            NodeOutput::Sections(_) => Some(ValueKind::Sections),
            NodeOutput::KeyTimeInstances(_) => Some(ValueKind::KeyTimeInstances),
            NodeOutput::KeyPointValues(_) => Some(ValueKind::KeyPointValues),
            NodeOutput::Nothing => None,
        }
    }

    /// Attaches `name` to the output. `None` for [`NodeOutput::Nothing`].
    pub fn into_value(self, name: &str) -> Option<NodeValue> {
        let value = match self {
            NodeOutput::Parameter(series) => NodeValue::Parameter(Parameter::from_series(name, series)),
            NodeOutput::Attribute(value) => NodeValue::Attribute(Attribute::new(name, value)),
            NodeOutput::Sections(set) => NodeValue::Sections(renamed(set, name)),
            NodeOutput::KeyTimeInstances(set) => NodeValue::KeyTimeInstances(renamed(set, name)),
            NodeOutput::KeyPointValues(set) => NodeValue::KeyPointValues(renamed(set, name)),
            NodeOutput::Nothing => return None,
        };
        Some(value)
    }
}

fn renamed<T>(mut set: EventSet<T>, name: &str) -> EventSet<T> {
    set.name = name.to_string();
    set
}

/// A node built from a descriptor and a closure.
pub struct FnNode<F> {
    descriptor: NodeDescriptor,
    derive: F,
}

impl<F> FnNode<F>
where
    F: Fn(&DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> + Send + Sync,
{
    pub fn new(descriptor: NodeDescriptor, derive: F) -> Self {
        Self { descriptor, derive }
    }
}

impl<F> DerivedNode for FnNode<F>
where
    F: Fn(&DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> + Send + Sync,
{
    fn descriptor(&self) -> NodeDescriptor { self.descriptor.clone() }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        (self.derive)(args)
    }
}
