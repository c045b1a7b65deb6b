//! flight_attributes.rs
//! Attribute nodes describing the flight as a whole: where it departed from
//! and arrived at, and how heavy it was.
//!
//! Airport and runway nodes ask the external lookup service first and fall
//! back to the value supplied by the Achieved Flight Record (AFR). A
//! "not found" answer is routine and only logged; a transport failure fails
//! the node.

use crate::api::{AirportLookup, LookupError, RunwayHint, RunwayPhase};
use crate::node::{DeriveArgs, DeriveError, DerivedNode, NodeDescriptor, NodeOutput};
use crate::store::{AttributeValue, EventSet, KeyPointValue, ValueKind};
use std::sync::Arc;
use tracing::{debug, info};

const A: ValueKind = ValueKind::Attribute;
const KPV: ValueKind = ValueKind::KeyPointValues;

/// Which KPV of a set to use: the first for takeoff, the last for landing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pick {
    First,
    Last,
}

impl Pick {
    fn value(self, set: &EventSet<KeyPointValue>) -> Option<f64> {
        match self {
            Pick::First => set.first(),
            Pick::Last => set.last(),
        }
        .map(|kpv| kpv.value)
    }
}

fn fallback(afr: Option<&AttributeValue>) -> NodeOutput {
    afr.map_or(NodeOutput::Nothing, |v| NodeOutput::Attribute(v.clone()))
}

// 1. Airports

/// Nearest airport to the liftoff or touchdown position.
pub struct NearestAirport {
    name: &'static str,
    latitude: &'static str,
    longitude: &'static str,
    afr: &'static str,
    pick: Pick,
    lookup: Arc<dyn AirportLookup>,
}

impl NearestAirport {
    pub fn takeoff(lookup: Arc<dyn AirportLookup>) -> Self {
        Self {
            name: "Takeoff Airport",
            latitude: "Latitude At Liftoff",
            longitude: "Longitude At Liftoff",
            afr: "AFR Takeoff Airport",
            pick: Pick::First,
            lookup,
        }
    }

    pub fn landing(lookup: Arc<dyn AirportLookup>) -> Self {
        Self {
            name: "Landing Airport",
            latitude: "Latitude At Touchdown",
            longitude: "Longitude At Touchdown",
            afr: "AFR Landing Airport",
            pick: Pick::Last,
            lookup,
        }
    }
}

/// Operable with an AFR value, or with both coordinates.
fn airport_feasible(names: &[&str]) -> bool {
    let has = |prefix: &str| names.iter().any(|n| n.starts_with(prefix));
    has("AFR ") || (has("Latitude ") && has("Longitude "))
}

impl DerivedNode for NearestAirport {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::attribute(self.name)
            .optional(self.latitude, KPV)
            .optional(self.longitude, KPV)
            .optional(self.afr, A)
            .with_feasibility(airport_feasible)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let afr = args.opt_attribute(self.afr)?.map(|a| &a.value);
        let latitude = args.opt_key_point_values(self.latitude)?.and_then(|k| self.pick.value(k));
        let longitude = args.opt_key_point_values(self.longitude)?.and_then(|k| self.pick.value(k));

        let (Some(lat), Some(lon)) = (latitude, longitude) else {
            debug!(node = self.name, "No position available, using AFR value");
            return Ok(fallback(afr));
        };
        match self.lookup.get_nearest_airport(lat, lon) {
            Ok(airport) => Ok(NodeOutput::Attribute(AttributeValue::Record(airport))),
            Err(LookupError::NotFound(msg)) => {
                info!(node = self.name, latitude = lat, longitude = lon, "{}; using AFR value", msg);
                Ok(fallback(afr))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// 2. Runways

/// Runway used for takeoff or landing at an already known airport.
///
/// For takeoff the position is always passed to the lookup. For landing it
/// is only passed when "Precise Positioning" is set, and the last ILS
/// frequency tuned during the approach is passed when recorded. The phase
/// hint is left out when positioning is precise.
pub struct NearestRunway {
    name: &'static str,
    phase: RunwayPhase,
    airport: &'static str,
    afr: &'static str,
    heading: &'static str,
    latitude: &'static str,
    longitude: &'static str,
    ils_frequency: Option<&'static str>,
    pick: Pick,
    lookup: Arc<dyn AirportLookup>,
}

impl NearestRunway {
    pub fn takeoff(lookup: Arc<dyn AirportLookup>) -> Self {
        Self {
            name: "Takeoff Runway",
            phase: RunwayPhase::Takeoff,
            airport: "Takeoff Airport",
            afr: "AFR Takeoff Runway",
            heading: "Heading At Liftoff",
            latitude: "Latitude At Liftoff",
            longitude: "Longitude At Liftoff",
            ils_frequency: None,
            pick: Pick::First,
            lookup,
        }
    }

    pub fn landing(lookup: Arc<dyn AirportLookup>) -> Self {
        Self {
            name: "Landing Runway",
            phase: RunwayPhase::Landing,
            airport: "Landing Airport",
            afr: "AFR Landing Runway",
            heading: "Heading At Touchdown",
            latitude: "Latitude At Touchdown",
            longitude: "Longitude At Touchdown",
            ils_frequency: Some("ILS Frequency During Approach"),
            pick: Pick::Last,
            lookup,
        }
    }

    fn hint(&self, args: &DeriveArgs<'_>) -> Result<RunwayHint, DeriveError> {
        let precise = matches!(
            args.opt_attribute("Precise Positioning")?.map(|a| &a.value),
            Some(AttributeValue::Flag(true))
        );
        let mut hint = RunwayHint { phase: (!precise).then_some(self.phase), ..Default::default() };
        if precise || self.phase == RunwayPhase::Takeoff {
            hint.latitude = args.opt_key_point_values(self.latitude)?.and_then(|k| self.pick.value(k));
            hint.longitude = args.opt_key_point_values(self.longitude)?.and_then(|k| self.pick.value(k));
        }
        if let Some(ils) = self.ils_frequency {
            hint.ils_frequency = args.opt_key_point_values(ils)?.and_then(|k| Pick::Last.value(k));
        }
        Ok(hint)
    }
}

/// Operable with an AFR value, or with an airport and a heading.
fn runway_feasible(names: &[&str]) -> bool {
    let has = |pred: &dyn Fn(&str) -> bool| names.iter().any(|n| pred(n));
    has(&|n| n.starts_with("AFR "))
        || (has(&|n| n.ends_with(" Airport") && !n.starts_with("AFR ")) && has(&|n| n.starts_with("Heading ")))
}

/// Airport identifier from a lookup record (`{"id": ..}`) or a bare number.
fn airport_id(value: &AttributeValue) -> Option<u64> {
    match value {
        AttributeValue::Record(record) => record.get("id").and_then(|id| id.as_u64()),
        AttributeValue::Number(n) if *n >= 0.0 && n.fract() == 0.0 => Some(*n as u64),
        _ => None,
    }
}

impl DerivedNode for NearestRunway {
    fn descriptor(&self) -> NodeDescriptor {
        let descriptor = NodeDescriptor::attribute(self.name)
            .optional(self.airport, A)
            .optional(self.afr, A)
            .optional(self.heading, KPV)
            .optional(self.latitude, KPV)
            .optional(self.longitude, KPV)
            .optional("Precise Positioning", A)
            .with_feasibility(runway_feasible);
        match self.ils_frequency {
            Some(ils) => descriptor.optional(ils, KPV),
            None => descriptor,
        }
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let afr = args.opt_attribute(self.afr)?.map(|a| &a.value);
        let airport = args.opt_attribute(self.airport)?.and_then(|a| airport_id(&a.value));
        let heading = args.opt_key_point_values(self.heading)?.and_then(|k| self.pick.value(k));

        let (Some(airport), Some(heading)) = (airport, heading) else {
            debug!(node = self.name, "No airport or heading available, using AFR value");
            return Ok(fallback(afr));
        };
        let hint = self.hint(args)?;
        match self.lookup.get_nearest_runway(airport, heading, &hint) {
            Ok(runway) => Ok(NodeOutput::Attribute(AttributeValue::Record(runway))),
            Err(LookupError::NotFound(msg)) => {
                info!(node = self.name, airport, heading, "{}; using AFR value", msg);
                Ok(fallback(afr))
            }
            Err(e) => Err(e.into()),
        }
    }
}

// 3. Gross weights

/// Gross weight in kg at liftoff (first value) or touchdown (last value).
pub struct GrossWeight {
    name: &'static str,
    source: &'static str,
    pick: Pick,
}

impl GrossWeight {
    pub fn takeoff() -> Self {
        Self { name: "Takeoff Gross Weight", source: "Gross Weight At Liftoff", pick: Pick::First }
    }

    pub fn landing() -> Self {
        Self { name: "Landing Gross Weight", source: "Gross Weight At Touchdown", pick: Pick::Last }
    }
}

impl DerivedNode for GrossWeight {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::attribute(self.name).requires(self.source, KPV)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let kpvs = args.key_point_values(self.source)?;
        Ok(self.pick.value(kpvs).map_or(NodeOutput::Nothing, |w| NodeOutput::Attribute(AttributeValue::Number(w))))
    }
}
