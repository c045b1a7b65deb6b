//! descriptor.rs
//! Declarative description of a node: what it produces, what it consumes and
//! which subsets of its inputs it can work with.

use crate::store::ValueKind;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Upper bound on declared dependencies; combinations grow as 2^n.
pub const MAX_DEPENDENCIES: usize = 16;

/// Indices into a descriptor's dependency list, ascending.
pub type Combination = SmallVec<[u16; 8]>;

/// Extra acceptance test applied to each candidate combination, given the
/// names of the arguments it contains.
pub type Feasibility = fn(&[&str]) -> bool;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub kind: ValueKind,
    pub required: bool,
}

#[derive(Clone)]
pub struct NodeDescriptor {
    pub name: String,
    pub kind: ValueKind,
    pub dependencies: Vec<Dependency>,
    pub feasibility: Option<Feasibility>,
}

impl fmt::Debug for NodeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("dependencies", &self.dependencies)
            .field("feasibility", &self.feasibility.is_some())
            .finish()
    }
}

impl NodeDescriptor {
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self { name: name.into(), kind, dependencies: Vec::new(), feasibility: None }
    }

    pub fn parameter(name: impl Into<String>) -> Self { Self::new(name, ValueKind::Parameter) }

    pub fn attribute(name: impl Into<String>) -> Self { Self::new(name, ValueKind::Attribute) }

    pub fn sections(name: impl Into<String>) -> Self { Self::new(name, ValueKind::Sections) }

    pub fn key_time_instances(name: impl Into<String>) -> Self { Self::new(name, ValueKind::KeyTimeInstances) }

    pub fn key_point_values(name: impl Into<String>) -> Self { Self::new(name, ValueKind::KeyPointValues) }

    pub fn requires(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.dependencies.push(Dependency { name: name.into(), kind, required: true });
        self
    }

    pub fn optional(mut self, name: impl Into<String>, kind: ValueKind) -> Self {
        self.dependencies.push(Dependency { name: name.into(), kind, required: false });
        self
    }

    pub fn with_feasibility(mut self, feasibility: Feasibility) -> Self {
        self.feasibility = Some(feasibility);
        self
    }

    pub fn dependency_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.dependencies.iter().map(|d| d.name.as_str())
    }

    pub fn dependency(&self, name: &str) -> Option<&Dependency> {
        self.dependencies.iter().find(|d| d.name == name)
    }

    pub fn combination_names(&self, combination: &[u16]) -> Vec<&str> {
        combination
            .iter()
            .map(|&i| self.dependencies[i as usize].name.as_str())
            .collect()
    }

    /// Every subset of the declared dependencies this node accepts, ordered
    /// by size and then lexicographically by declaration index.
    ///
    /// A subset is accepted when it is non-empty, contains every required
    /// dependency and passes the feasibility test. The result is empty when
    /// more than [`MAX_DEPENDENCIES`] are declared; registration rejects such
    /// descriptors.
    pub fn operational_combinations(&self) -> Vec<Combination> {
        let n = self.dependencies.len();
        let mut accepted = Vec::new();
        if n > MAX_DEPENDENCIES {
            return accepted;
        }
        let required: SmallVec<[u16; 8]> = self
            .dependencies
            .iter()
            .enumerate()
            .filter(|(_, d)| d.required)
            .map(|(i, _)| i as u16)
            .collect();

        for_each_subset(n, |combination| {
            if !required.iter().all(|r| combination.contains(r)) {
                return;
            }
            if let Some(feasible) = self.feasibility {
                if !feasible(&self.combination_names(combination)) {
                    return;
                }
            }
            accepted.push(Combination::from_slice(combination));
        });
        accepted
    }

    /// The first of `combinations` whose arguments are all available.
    pub fn first_satisfied<'c>(
        &self,
        combinations: &'c [Combination],
        is_available: impl Fn(&str) -> bool,
    ) -> Option<&'c Combination> {
        combinations.iter().find(|combination| {
            combination
                .iter()
                .all(|&i| is_available(&self.dependencies[i as usize].name))
        })
    }

    /// Whether some operational combination is a subset of `available`.
    pub fn can_operate(&self, available: &[&str]) -> bool {
        let combinations = self.operational_combinations();
        self.first_satisfied(&combinations, |name| available.contains(&name))
            .is_some()
    }
}

/// Visits every non-empty subset of `0..n` by size, then lexicographically.
fn for_each_subset(n: usize, mut visit: impl FnMut(&[u16])) {
    'arity: for k in 1..=n {
        let mut combination: SmallVec<[u16; 8]> = (0..k as u16).collect();
        loop {
            visit(&combination);
            // Rightmost position that can still be advanced.
            let Some(i) = (0..k).rev().find(|&i| (combination[i] as usize) < n - k + i) else {
                continue 'arity;
            };
            combination[i] += 1;
            for j in i + 1..k {
                combination[j] = combination[j - 1] + 1;
            }
        }
    }
}
