use super::ledger::ComputationError;
use crate::analysis::resolver::{ExecutionPlan, UnresolvedNode};
use crate::store::NodeValue;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedNode {
    pub name: String,
    pub error: String,
}

/// Outcome of every registered node for one flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// Nodes that produced a value, in execution order.
    pub derived: Vec<String>,
    /// Nodes whose derive step ran but reported nothing.
    pub no_result: Vec<String>,
    /// Planned nodes skipped because an upstream node failed.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedNode>,
    pub unresolved: Vec<UnresolvedNode>,
    pub preempted: Vec<String>,
    /// Arguments actually supplied to each node that ran.
    pub inputs: BTreeMap<String, Vec<String>>,
    /// Derived values by kind label.
    pub counts_by_kind: BTreeMap<String, usize>,
}

impl RunReport {
    pub fn new(plan: &ExecutionPlan) -> Self {
        Self {
            unresolved: plan.unresolved.clone(),
            preempted: plan.preempted.clone(),
            ..Default::default()
        }
    }

    pub fn record(&mut self, name: &str, inputs: Vec<String>, outcome: &Result<NodeValue, ComputationError>) {
        match outcome {
            Ok(value) => {
                self.derived.push(name.to_string());
                *self.counts_by_kind.entry(value.kind().to_string()).or_insert(0) += 1;
            }
            Err(ComputationError::NoResult { .. }) => self.no_result.push(name.to_string()),
            Err(ComputationError::UpstreamUnavailable { .. }) => self.skipped.push(name.to_string()),
            Err(e) => self.failed.push(FailedNode { name: name.to_string(), error: e.to_string() }),
        }
        if !inputs.is_empty() {
            self.inputs.insert(name.to_string(), inputs);
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} derived, {} no result, {} skipped, {} failed, {} unresolved",
            self.derived.len(),
            self.no_result.len(),
            self.skipped.len(),
            self.failed.len(),
            self.unresolved.len()
        )
    }
}
