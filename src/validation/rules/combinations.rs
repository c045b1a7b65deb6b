//! Validation rule for a node's own declaration.

use crate::node::MAX_DEPENDENCIES;
use crate::store::RegisteredNode;
use crate::validation::error::{ValidationError, ValidationErrorType};
use std::collections::HashSet;

/// "The Dead Node Rule": a node must be able to run with some inputs.
///
/// Rejects descriptors that declare too many inputs to enumerate, declare an
/// input twice, or whose required inputs and feasibility test leave no
/// operational combination at all.
pub(crate) fn validate_combinations(node: &RegisteredNode) -> Option<ValidationError> {
    let descriptor = &node.descriptor;
    let error = |error_type, message| ValidationError {
        node_id: node.id,
        node_name: descriptor.name.clone(),
        error_type,
        message,
    };

    if descriptor.dependencies.len() > MAX_DEPENDENCIES {
        return Some(error(
            ValidationErrorType::TooManyDependencies,
            format!(
                "Declares {} dependencies; at most {} are supported.",
                descriptor.dependencies.len(),
                MAX_DEPENDENCIES
            ),
        ));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = descriptor.dependency_names().find(|name| !seen.insert(*name)) {
        return Some(error(
            ValidationErrorType::DuplicateDependency,
            format!("Dependency '{}' is declared more than once.", dup),
        ));
    }

    if node.combinations.is_empty() {
        return Some(error(
            ValidationErrorType::NoCombinations,
            "No operational combination: required inputs and the feasibility test exclude every subset."
                .to_string(),
        ));
    }
    None
}
