//! The standard node catalogue.
//!
//! [`standard_registry`] registers every built-in node, parameterised by the
//! processing configuration, and validates the result. Callers can keep
//! registering their own nodes on the returned registry before handing it to
//! a [`FlightProcessor`](crate::compute::FlightProcessor).
pub mod derived_parameters;
pub mod flight_attributes;
pub mod flight_phases;
pub mod key_point_values;

use crate::api::AirportLookup;
use crate::config::ProcessConfig;
use crate::store::{NodeRegistry, RegistryError};
use derived_parameters::*;
use flight_attributes::{GrossWeight, NearestAirport, NearestRunway};
use flight_phases::Fast;
use key_point_values::VALUES_AT_INSTANTS;
use std::sync::Arc;
use tracing::debug;

pub fn standard_registry(
    config: &ProcessConfig,
    lookup: Arc<dyn AirportLookup>,
) -> Result<NodeRegistry, RegistryError> {
    let mut registry = NodeRegistry::new();
    let bands = &config.hysteresis;
    let width = config.rate_of_change_width;

    // 1. Derived parameters
    registry.register(Pitch)?;
    registry.register(HeadingContinuous)?;
    registry.register(HeadingTrue)?;
    registry.register(RateOfTurn { width })?;
    registry.register(VerticalSpeed { width })?;
    registry.register(VerticalSpeedForFlightPhases { band: bands.vertical_speed })?;
    registry.register(HysteresisParameter::airspeed(bands.airspeed))?;
    registry.register(HysteresisParameter::altitude(bands.altitude))?;
    registry.register(DistanceTravelled)?;
    registry.register(AccelerationVertical)?;
    registry.register(AltitudeRadio)?;
    registry.register(AltitudeTail)?;
    registry.register(EngineN1::average())?;
    registry.register(EngineN1::maximum())?;
    registry.register(EngineN1::minimum())?;

    // 2. Sections
    registry.register(Fast { threshold: config.fast_airspeed })?;

    // 3. Key point values
    for kpv in VALUES_AT_INSTANTS {
        registry.register(kpv)?;
    }

    // 4. Flight attributes
    registry.register(NearestAirport::takeoff(lookup.clone()))?;
    registry.register(NearestAirport::landing(lookup.clone()))?;
    registry.register(NearestRunway::takeoff(lookup.clone()))?;
    registry.register(NearestRunway::landing(lookup))?;
    registry.register(GrossWeight::takeoff())?;
    registry.register(GrossWeight::landing())?;

    registry.validate()?;
    debug!(nodes = registry.count(), "Standard registry built");
    Ok(registry)
}
