//! api.rs
//! Interface to the external airport/runway lookup service.
//!
//! The service itself lives outside this crate; nodes only see the
//! [`AirportLookup`] trait. Results are returned as JSON records so their
//! schema stays owned by the service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    /// The service answered but has no match. Expected during normal operation.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The service could not be reached or returned garbage.
    #[error("Lookup transport error: {0}")]
    Transport(String),
}

/// Phase of flight a runway is being looked up for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunwayPhase {
    Takeoff,
    Landing,
}

/// Optional refinements for a runway lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunwayHint {
    /// Only sent when position data is not known to be precise.
    pub phase: Option<RunwayPhase>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub ils_frequency: Option<f64>,
}

pub trait AirportLookup: Send + Sync {
    fn get_nearest_airport(&self, latitude: f64, longitude: f64) -> Result<Value, LookupError>;

    fn get_nearest_runway(
        &self,
        airport_id: u64,
        heading: f64,
        hint: &RunwayHint,
    ) -> Result<Value, LookupError>;
}

/// A lookup that never finds anything. Airport and runway attributes then
/// come from AFR values alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl AirportLookup for NoLookup {
    fn get_nearest_airport(&self, latitude: f64, longitude: f64) -> Result<Value, LookupError> {
        Err(LookupError::NotFound(format!("No airport service for ({latitude}, {longitude})")))
    }

    fn get_nearest_runway(&self, airport_id: u64, heading: f64, _hint: &RunwayHint) -> Result<Value, LookupError> {
        Err(LookupError::NotFound(format!(
            "No runway service for airport {airport_id} heading {heading}"
        )))
    }
}
