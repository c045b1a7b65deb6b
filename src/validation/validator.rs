//! The central validator that runs every registry rule.
use super::error::ValidationError;
use super::rules::{combinations, kinds};
use crate::store::NodeRegistry;

/// Static checks over a complete registry, run once before any flight is
/// processed. Collects every error instead of stopping at the first.
pub struct Validator<'a> {
    registry: &'a NodeRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(registry: &'a NodeRegistry) -> Self {
        Self { registry }
    }

    /// # Returns
    /// - `Ok(())` if no validation errors are found.
    /// - `Err(Vec<ValidationError>)` containing all errors discovered.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        // Rules only look at a node and the producers of its inputs, so
        // registry order is as good as any.
        for node in self.registry.iter() {
            if let Some(err) = combinations::validate_combinations(node) {
                errors.push(err);
            }
            if let Some(err) = kinds::validate_kinds(self.registry, node) {
                errors.push(err);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
