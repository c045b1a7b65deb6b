use super::resolver::ExecutionPlan;
use crate::store::{NodeId, NodeRegistry};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Groups of `candidates` that depend on one another in a loop.
///
/// Candidates that could not run even if every other candidate were derived
/// are pruned first, so a node blocked by a missing raw input is never
/// reported as a loop member. The producer -> consumer graph is then built
/// from the dependencies of the combinations that remain satisfiable.
/// Returns every strongly connected component with more than one member, or
/// with a single member that names itself as a dependency. Members and
/// groups are in registry order.
pub fn find_cycles(
    registry: &NodeRegistry,
    candidates: &[NodeId],
    is_available: impl Fn(&str) -> bool,
) -> Vec<Vec<NodeId>> {
    // 1. Prune to the nodes that could run if the others were derived.
    let mut viable: Vec<NodeId> = candidates.to_vec();
    loop {
        let names: HashSet<&str> = viable.iter().map(|&id| registry.get(id).descriptor.name.as_str()).collect();
        let before = viable.len();
        viable.retain(|&id| !open_combinations(registry, id, &names, &is_available).is_empty());
        if viable.len() == before {
            break;
        }
    }
    let names: HashSet<&str> = viable.iter().map(|&id| registry.get(id).descriptor.name.as_str()).collect();

    // 2. Graph over the surviving nodes
    let mut graph: DiGraph<NodeId, ()> = DiGraph::with_capacity(viable.len(), viable.len());
    let indices: Vec<NodeIndex> = viable.iter().map(|&id| graph.add_node(id)).collect();
    let by_name: HashMap<&str, NodeIndex> = viable
        .iter()
        .zip(&indices)
        .map(|(&id, &ix)| (registry.get(id).descriptor.name.as_str(), ix))
        .collect();

    for (&id, &consumer) in viable.iter().zip(&indices) {
        for combination in open_combinations(registry, id, &names, &is_available) {
            for dep in combination {
                if let Some(&producer) = by_name.get(dep) {
                    graph.update_edge(producer, consumer, ());
                }
            }
        }
    }

    let mut cycles: Vec<Vec<NodeId>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .map(|scc| {
            let mut members: Vec<NodeId> = scc.iter().map(|&ix| graph[ix]).collect();
            members.sort();
            members
        })
        .collect();
    cycles.sort();
    cycles
}

/// Combinations of `id` whose inputs are all available or produced by one
/// of `pending`.
fn open_combinations<'r>(
    registry: &'r NodeRegistry,
    id: NodeId,
    pending: &HashSet<&str>,
    is_available: &impl Fn(&str) -> bool,
) -> Vec<Vec<&'r str>> {
    let node = registry.get(id);
    node.combinations
        .iter()
        .map(|c| node.descriptor.combination_names(c))
        .filter(|names| names.iter().all(|n| is_available(n) || pending.contains(n)))
        .collect()
}

/// Names of every planned step that consumes, directly or transitively, one
/// of `start`. The start names themselves are not included.
pub fn downstream_from(plan: &ExecutionPlan, start: &[&str]) -> BTreeSet<String> {
    let mut visited: HashSet<&str> = HashSet::new();
    let mut affected = BTreeSet::new();
    let mut queue: VecDeque<&str> = start.iter().copied().collect();

    while let Some(name) = queue.pop_front() {
        if !visited.insert(name) {
            continue;
        }
        for step in plan.steps.iter().filter(|s| s.inputs.iter().any(|i| i == name)) {
            affected.insert(step.name.clone());
            queue.push_back(&step.name);
        }
    }
    affected
}

/// Checks that no step consumes a planned name before the step producing it.
pub fn verify_order(plan: &ExecutionPlan) -> Result<(), String> {
    let planned: HashSet<&str> = plan.steps.iter().map(|s| s.name.as_str()).collect();
    let mut produced: HashSet<&str> = HashSet::with_capacity(planned.len());

    for step in &plan.steps {
        if let Some(early) = step
            .inputs
            .iter()
            .find(|i| planned.contains(i.as_str()) && !produced.contains(i.as_str()))
        {
            return Err(format!("Step '{}' consumes '{}' before it is derived", step.name, early));
        }
        produced.insert(&step.name);
    }
    Ok(())
}
