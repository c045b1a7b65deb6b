//! resolver.rs
//! Builds a per-flight execution plan from the registry and the names a
//! flight actually provides.
//!
//! Resolution is a fixed point: each pass walks the registry in order and
//! plans every node that has become satisfiable, making its name available
//! immediately. Passes repeat until one plans nothing. Whatever is left is
//! reported, with loops told apart from plain missing inputs.

use super::topology::find_cycles;
use crate::store::{NodeId, NodeRegistry};
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Required nodes could not be resolved: {}", .nodes.join(", "))]
    RequiredNodesUnresolved { nodes: Vec<String>, plan: Box<ExecutionPlan> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStep {
    pub node: NodeId,
    pub name: String,
    /// 1-based resolver pass that planned this step.
    pub pass: usize,
    /// The operational combination that first became satisfiable.
    pub combination: Vec<String>,
    /// Every declared dependency available when the step was planned. A
    /// superset of `combination`.
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// No operational combination could be satisfied; `missing` lists the
    /// declared dependencies that never became available.
    MissingDependencies { missing: Vec<String> },
    /// The node is part of a dependency loop (possibly with itself).
    Cycle { members: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnresolvedNode {
    pub node: NodeId,
    pub name: String,
    #[serde(flatten)]
    pub reason: UnresolvedReason,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionPlan {
    /// Steps in execution order.
    pub steps: Vec<PlannedStep>,
    pub unresolved: Vec<UnresolvedNode>,
    /// Registered nodes not planned because the flight already records a
    /// value under their name.
    pub preempted: Vec<String>,
}

impl ExecutionPlan {
    pub fn step(&self, name: &str) -> Option<&PlannedStep> {
        self.steps.iter().find(|s| s.name == name)
    }

    pub fn is_planned(&self, name: &str) -> bool {
        self.step(name).is_some()
    }

    pub fn unresolved_node(&self, name: &str) -> Option<&UnresolvedNode> {
        self.unresolved.iter().find(|u| u.name == name)
    }

    pub fn order(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Plans every registered node that can run given `available` input names.
///
/// Deterministic: the same registry and the same set of names always give
/// the same plan, regardless of the iteration order of `available`.
pub fn resolve<'a>(registry: &NodeRegistry, available: impl IntoIterator<Item = &'a str>) -> ExecutionPlan {
    let mut names: HashSet<String> = available.into_iter().map(str::to_string).collect();
    let mut done = vec![false; registry.count()];
    let mut plan = ExecutionPlan::default();

    // 1. Recorded values take precedence over derivation.
    for node in registry.iter() {
        if names.contains(&node.descriptor.name) {
            done[node.id.index()] = true;
            plan.preempted.push(node.descriptor.name.clone());
        }
    }

    // 2. Fixed-point passes
    let mut pass = 0;
    loop {
        pass += 1;
        let mut added = 0;
        for node in registry.iter() {
            if done[node.id.index()] {
                continue;
            }
            let descriptor = &node.descriptor;
            let Some(combination) = descriptor.first_satisfied(&node.combinations, |n| names.contains(n)) else {
                continue;
            };

            let combination = descriptor
                .combination_names(combination)
                .into_iter()
                .map(str::to_string)
                .collect();
            let inputs = descriptor
                .dependency_names()
                .filter(|n| names.contains(*n))
                .map(str::to_string)
                .collect();
            plan.steps.push(PlannedStep {
                node: node.id,
                name: descriptor.name.clone(),
                pass,
                combination,
                inputs,
            });
            names.insert(descriptor.name.clone());
            done[node.id.index()] = true;
            added += 1;
        }
        debug!(pass, added, "Resolver pass complete");
        if added == 0 {
            break;
        }
    }

    // 3. Diagnose the remainder
    let remaining: Vec<NodeId> = registry.iter().map(|n| n.id).filter(|id| !done[id.index()]).collect();
    let mut in_cycle: Vec<Option<Vec<String>>> = vec![None; registry.count()];
    for members in find_cycles(registry, &remaining, |n| names.contains(n)) {
        let member_names: Vec<String> =
            members.iter().map(|id| registry.get(*id).descriptor.name.clone()).collect();
        warn!(members = ?member_names, "Dependency cycle; nodes will not be derived");
        for id in members {
            in_cycle[id.index()] = Some(member_names.clone());
        }
    }

    for id in remaining {
        let descriptor = &registry.get(id).descriptor;
        let reason = match in_cycle[id.index()].take() {
            Some(members) => UnresolvedReason::Cycle { members },
            None => {
                let missing: Vec<String> = descriptor
                    .dependency_names()
                    .filter(|n| !names.contains(*n))
                    .map(str::to_string)
                    .collect();
                info!(node = %descriptor.name, missing = ?missing, "Node cannot operate");
                UnresolvedReason::MissingDependencies { missing }
            }
        };
        plan.unresolved.push(UnresolvedNode { node: id, name: descriptor.name.clone(), reason });
    }

    debug!(
        planned = plan.steps.len(),
        unresolved = plan.unresolved.len(),
        preempted = plan.preempted.len(),
        passes = pass,
        "Execution plan built"
    );
    plan
}

/// Like [`resolve`], but fails when any of `required` is neither planned nor
/// recorded in the input.
pub fn resolve_required<'a>(
    registry: &NodeRegistry,
    available: impl IntoIterator<Item = &'a str>,
    required: &[String],
) -> Result<ExecutionPlan, ResolveError> {
    let available: Vec<&str> = available.into_iter().collect();
    let plan = resolve(registry, available.iter().copied());
    let nodes: Vec<String> = required
        .iter()
        .filter(|r| !plan.is_planned(r) && !available.contains(&r.as_str()))
        .cloned()
        .collect();
    if nodes.is_empty() {
        Ok(plan)
    } else {
        Err(ResolveError::RequiredNodesUnresolved { nodes, plan: Box::new(plan) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::topology::verify_order;
    use crate::node::{DerivedNode, FnNode, NodeDescriptor, NodeOutput};
    use crate::store::ValueKind;

    fn node(descriptor: NodeDescriptor) -> impl DerivedNode + 'static {
        FnNode::new(descriptor, |_| Ok(NodeOutput::Nothing))
    }

    fn requires(name: &str, deps: &[&str]) -> NodeDescriptor {
        deps.iter()
            .fold(NodeDescriptor::parameter(name), |d, dep| d.requires(*dep, ValueKind::Parameter))
    }

    fn registry(descriptors: Vec<NodeDescriptor>) -> NodeRegistry {
        let mut reg = NodeRegistry::new();
        for d in descriptors {
            reg.register(node(d)).unwrap();
        }
        reg
    }

    fn engines() -> NodeDescriptor {
        (1..=4).fold(NodeDescriptor::parameter("Eng (*) N1 Avg"), |d, i| {
            d.optional(format!("Eng ({i}) N1"), ValueKind::Parameter)
        })
    }

    #[test]
    fn test_chain_reaches_fixed_point_over_several_passes() {
        // Registered consumer-first so each pass can only add one node.
        let reg = registry(vec![requires("A", &["B"]), requires("B", &["C"]), requires("C", &["X"])]);
        let plan = resolve(&reg, ["X"]);
        assert_eq!(plan.order(), vec!["C", "B", "A"]);
        assert_eq!(plan.steps.iter().map(|s| s.pass).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(plan.unresolved.is_empty());
        assert!(verify_order(&plan).is_ok());
    }

    #[test]
    fn test_names_become_available_within_the_same_pass() {
        let reg = registry(vec![requires("C", &["X"]), requires("B", &["C"]), requires("A", &["B"])]);
        let plan = resolve(&reg, ["X"]);
        assert_eq!(plan.order(), vec!["C", "B", "A"]);
        assert!(plan.steps.iter().all(|s| s.pass == 1));
    }

    #[test]
    fn test_mutual_cycle_is_reported_as_cycle() {
        let reg = registry(vec![requires("P", &["Q"]), requires("Q", &["P"]), requires("R", &["P"])]);
        let plan = resolve(&reg, ["X"]);
        assert!(plan.steps.is_empty());
        let members = vec!["P".to_string(), "Q".to_string()];
        assert_eq!(plan.unresolved_node("P").unwrap().reason, UnresolvedReason::Cycle { members: members.clone() });
        assert_eq!(plan.unresolved_node("Q").unwrap().reason, UnresolvedReason::Cycle { members });
        assert_eq!(
            plan.unresolved_node("R").unwrap().reason,
            UnresolvedReason::MissingDependencies { missing: vec!["P".into()] }
        );
    }

    #[test]
    fn test_blocked_node_with_optional_loop_is_not_a_cycle() {
        let p = NodeDescriptor::parameter("P")
            .requires("Missing", ValueKind::Parameter)
            .optional("Q", ValueKind::Parameter);
        let reg = registry(vec![p, requires("Q", &["P"])]);
        let plan = resolve(&reg, ["X"]);
        assert_eq!(
            plan.unresolved_node("P").unwrap().reason,
            UnresolvedReason::MissingDependencies { missing: vec!["Missing".into(), "Q".into()] }
        );
        assert_eq!(
            plan.unresolved_node("Q").unwrap().reason,
            UnresolvedReason::MissingDependencies { missing: vec!["P".into()] }
        );
    }

    #[test]
    fn test_fixed_point_omits_node_with_missing_input() {
        let reg = registry(vec![requires("A", &["X"]), requires("B", &["A"]), requires("C", &["B", "D"])]);
        let plan = resolve(&reg, ["X"]);
        assert_eq!(plan.order(), vec!["A", "B"]);
        assert_eq!(
            plan.unresolved,
            vec![UnresolvedNode {
                node: NodeId(2),
                name: "C".into(),
                reason: UnresolvedReason::MissingDependencies { missing: vec!["D".into()] },
            }]
        );
    }

    #[test]
    fn test_self_dependency_never_satisfies() {
        let d = NodeDescriptor::parameter("Smoothed")
            .requires("Altitude STD", ValueKind::Parameter)
            .optional("Smoothed", ValueKind::Parameter);
        let reg = registry(vec![d]);
        // With the optional self-reference only the required input matters.
        assert!(resolve(&reg, ["Altitude STD"]).is_planned("Smoothed"));

        let reg = registry(vec![requires("Loop", &["Loop"])]);
        let plan = resolve(&reg, ["Altitude STD"]);
        assert_eq!(
            plan.unresolved_node("Loop").unwrap().reason,
            UnresolvedReason::Cycle { members: vec!["Loop".into()] }
        );
    }

    #[test]
    fn test_missing_raw_input_is_listed() {
        let reg = registry(vec![requires("Pitch", &["Pitch (1)", "Pitch (2)"])]);
        let plan = resolve(&reg, ["Pitch (1)"]);
        assert_eq!(
            plan.unresolved,
            vec![UnresolvedNode {
                node: NodeId(0),
                name: "Pitch".into(),
                reason: UnresolvedReason::MissingDependencies { missing: vec!["Pitch (2)".into()] },
            }]
        );
    }

    #[test]
    fn test_first_declared_combination_with_opportunistic_inputs() {
        let reg = registry(vec![engines()]);
        let plan = resolve(&reg, ["Eng (4) N1", "Eng (2) N1"]);
        let step = plan.step("Eng (*) N1 Avg").unwrap();
        assert_eq!(step.combination, vec!["Eng (2) N1".to_string()]);
        assert_eq!(step.inputs, vec!["Eng (2) N1".to_string(), "Eng (4) N1".to_string()]);
    }

    #[test]
    fn test_plan_is_deterministic() {
        let reg = registry(vec![
            engines(),
            requires("C", &["X"]),
            requires("B", &["C", "Eng (*) N1 Avg"]),
            requires("P", &["Q"]),
            requires("Q", &["P"]),
        ]);
        let a = resolve(&reg, ["X", "Eng (1) N1", "Eng (3) N1"]);
        let b = resolve(&reg, ["Eng (3) N1", "X", "Eng (1) N1"]);
        assert_eq!(a, b);
        assert_eq!(a.order(), vec!["Eng (*) N1 Avg", "C", "B"]);
    }

    #[test]
    fn test_recorded_value_preempts_derivation() {
        let reg = registry(vec![requires("Heading Continuous", &["Heading"]), requires("Rate Of Turn", &["Heading Continuous"])]);
        let plan = resolve(&reg, ["Heading Continuous"]);
        assert_eq!(plan.preempted, vec!["Heading Continuous".to_string()]);
        assert_eq!(plan.order(), vec!["Rate Of Turn"]);
        assert!(plan.unresolved.is_empty());
    }

    #[test]
    fn test_required_nodes() {
        let reg = registry(vec![requires("Pitch", &["Pitch (1)", "Pitch (2)"])]);
        let required = vec!["Pitch".to_string()];
        assert!(resolve_required(&reg, ["Pitch (1)", "Pitch (2)"], &required).is_ok());
        // Recorded directly counts as resolved.
        assert!(resolve_required(&reg, ["Pitch"], &required).is_ok());
        match resolve_required(&reg, ["Pitch (1)"], &required) {
            Err(ResolveError::RequiredNodesUnresolved { nodes, plan }) => {
                assert_eq!(nodes, required);
                assert_eq!(plan.unresolved.len(), 1);
            }
            other => panic!("Expected unresolved error, got {:?}", other),
        }
    }
}
