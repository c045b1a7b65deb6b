// Crate root: the flight-data derivation core.
//
// Raw recorded values go in as a `FlightInput`; a `FlightProcessor` plans
// which registered nodes can run for that flight, runs them in dependency
// order and returns every derived value with a run report.

pub mod analysis;
pub mod api;
pub mod compute;
pub mod config;
pub mod display;
pub mod library;
pub mod node;
pub mod nodes;
pub mod store;
pub mod validation;

pub use analysis::{resolve, ExecutionPlan, ResolveError};
pub use api::{AirportLookup, LookupError, NoLookup};
pub use compute::{FlightProcessor, FlightResults, RunReport};
pub use config::ProcessConfig;
pub use display::format_trace;
pub use node::{DeriveArgs, DeriveError, DerivedNode, NodeDescriptor, NodeOutput};
pub use nodes::standard_registry;
pub use store::{FlightInput, MaskedArray, NodeRegistry, NodeValue, Parameter};
