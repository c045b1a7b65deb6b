//! Executes execution plans against per-flight ledgers.
pub mod engine;
pub mod ledger;
pub mod report;

pub use engine::{FlightProcessor, FlightResults};
pub use ledger::{ComputationError, Ledger};
pub use report::{FailedNode, RunReport};
