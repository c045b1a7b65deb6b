//! Errors raised while gathering arguments for, or running, a node's derive step.
use crate::api::LookupError;
use crate::library::LibraryError;
use crate::store::ValueKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeriveError {
    #[error("Node '{node}' needs '{argument}' but it is not available")]
    MissingArgument { node: String, argument: String },
    #[error("Node '{node}' did not declare an argument named '{argument}'")]
    UndeclaredArgument { node: String, argument: String },
    #[error("Argument '{argument}' of node '{node}' is a {found}, expected a {expected}")]
    WrongKind { node: String, argument: String, expected: ValueKind, found: ValueKind },
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error("Lookup failed: {0}")]
    Lookup(#[from] LookupError),
    #[error("{0}")]
    Precondition(String),
}
