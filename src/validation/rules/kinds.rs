//! Validation rule for consistency between consumers and producers.

use crate::store::{NodeRegistry, RegisteredNode};
use crate::validation::error::{ValidationError, ValidationErrorType};

/// "The Apples and Oranges Rule": a node may only ask for a name as the kind
/// that name's producer emits.
///
/// Dependencies with no registered producer are expected to come from the
/// flight's raw input and are not checked here.
pub(crate) fn validate_kinds(registry: &NodeRegistry, node: &RegisteredNode) -> Option<ValidationError> {
    let conflicts: Vec<String> = node
        .descriptor
        .dependencies
        .iter()
        .filter_map(|dep| {
            let producer = registry.find(&dep.name)?;
            (producer.descriptor.kind != dep.kind).then(|| {
                format!("'{}' requested as {} but produced as {}", dep.name, dep.kind, producer.descriptor.kind)
            })
        })
        .collect();

    if conflicts.is_empty() {
        return None;
    }
    Some(ValidationError {
        node_id: node.id,
        node_name: node.descriptor.name.clone(),
        error_type: ValidationErrorType::KindConflict,
        message: format!("Kind mismatch: {}.", conflicts.join("; ")),
    })
}
