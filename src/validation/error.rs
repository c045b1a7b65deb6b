//! Defines the error types for the validation module.
use crate::store::NodeId;
use std::fmt;

/// The specific category of a validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorType {
    /// No subset of the declared inputs is acceptable to the node.
    NoCombinations,
    /// The same input name is declared twice by one node.
    DuplicateDependency,
    /// More inputs than combination enumeration supports.
    TooManyDependencies,
    /// A declared input kind disagrees with the kind its producer emits.
    KindConflict,
}

/// A structured error report from registry validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub node_id: NodeId,
    pub node_name: String,
    pub error_type: ValidationErrorType,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.node_name, self.message)
    }
}
