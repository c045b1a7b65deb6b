//! registry.rs
//! The table of every node known to the process, built once at startup.

use super::types::NodeId;
use crate::node::{Combination, DerivedNode, NodeDescriptor};
use crate::validation::rules::combinations::validate_combinations;
use crate::validation::{ValidationError, Validator};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("A node named '{0}' is already registered")]
    DuplicateName(String),
    #[error("Invalid node registry:\n{}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(|e| format!("  {}", e)).collect::<Vec<_>>().join("\n")
}

/// A node together with its descriptor and its precomputed operational
/// combinations.
#[derive(Clone)]
pub struct RegisteredNode {
    pub id: NodeId,
    pub descriptor: NodeDescriptor,
    pub combinations: Vec<Combination>,
    pub node: Arc<dyn DerivedNode>,
}

impl std::fmt::Debug for RegisteredNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredNode")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor)
            .field("combinations", &self.combinations.len())
            .finish()
    }
}

/// Nodes in registration order, with unique names.
///
/// Registration order is the order the resolver walks in each pass, so it
/// is part of what makes plans deterministic.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: Vec<RegisteredNode>,
    index: HashMap<String, NodeId>,
}

impl NodeRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn count(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    pub fn register(&mut self, node: impl DerivedNode + 'static) -> Result<NodeId, RegistryError> {
        self.register_arc(Arc::new(node))
    }

    /// Adds a node, rejecting duplicate names and descriptors with no usable
    /// combination. Cross-node checks run in [`NodeRegistry::validate`].
    pub fn register_arc(&mut self, node: Arc<dyn DerivedNode>) -> Result<NodeId, RegistryError> {
        let descriptor = node.descriptor();
        if self.index.contains_key(&descriptor.name) {
            return Err(RegistryError::DuplicateName(descriptor.name));
        }

        let id = NodeId::new(self.nodes.len());
        let combinations = descriptor.operational_combinations();
        let registered = RegisteredNode { id, descriptor, combinations, node };
        if let Some(err) = validate_combinations(&registered) {
            return Err(RegistryError::Invalid(vec![err]));
        }

        debug!(
            node = %registered.descriptor.name,
            dependencies = registered.descriptor.dependencies.len(),
            combinations = registered.combinations.len(),
            "Registered node"
        );
        self.index.insert(registered.descriptor.name.clone(), id);
        self.nodes.push(registered);
        Ok(id)
    }

    /// Runs every registry rule; any error here is fatal at startup.
    pub fn validate(&self) -> Result<(), RegistryError> {
        Validator::new(self).validate().map_err(RegistryError::Invalid)
    }

    #[inline(always)]
    pub fn get(&self, id: NodeId) -> &RegisteredNode {
        &self.nodes[id.index()]
    }

    pub fn find(&self, name: &str) -> Option<&RegisteredNode> {
        self.index.get(name).map(|id| self.get(*id))
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegisteredNode> + '_ {
        self.nodes.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes.iter().map(|n| n.descriptor.name.as_str())
    }
}
