//! Static analysis of a registry against a flight: planning and graph queries.
pub mod resolver;
pub mod topology;

pub use resolver::{
    resolve, resolve_required, ExecutionPlan, PlannedStep, ResolveError, UnresolvedNode, UnresolvedReason,
};
