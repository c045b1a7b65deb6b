//! derived_parameters.rs
//! Nodes producing time series from other time series.

use crate::library::{
    align, blend_two_parameters, combine_aligned, hysteresis, integrate, mean_of_aligned,
    rate_of_change, straighten_headings, wrap_heading,
};
use crate::node::{DeriveArgs, DeriveError, DerivedNode, NodeDescriptor, NodeOutput};
use crate::store::{MaskedArray, Parameter, Series, ValueKind};
use tracing::debug;

const P: ValueKind = ValueKind::Parameter;

/// Merges the two pitch sensors into one series at twice their rate.
pub struct Pitch;

impl DerivedNode for Pitch {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter("Pitch").requires("Pitch (1)", P).requires("Pitch (2)", P)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let blended = blend_two_parameters(args.parameter("Pitch (1)")?, args.parameter("Pitch (2)")?)?;
        Ok(NodeOutput::Parameter(blended))
    }
}

/// Magnetic heading with the 360° wrap removed.
pub struct HeadingContinuous;

impl DerivedNode for HeadingContinuous {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter("Heading Continuous").requires("Heading", P)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let head = args.parameter("Heading")?;
        Ok(same_grid(head, straighten_headings(&head.array)))
    }
}

/// True heading in [0, 360), corrected by magnetic variation when recorded.
pub struct HeadingTrue;

impl DerivedNode for HeadingTrue {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter("Heading True")
            .requires("Heading Continuous", P)
            .optional("Magnetic Variation", P)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let head = args.parameter("Heading Continuous")?;
        let corrected = match args.opt_parameter("Magnetic Variation")? {
            Some(var) => head.array.zip_with(&align(var, head)?, |h, v| h + v),
            None => {
                debug!("No magnetic variation recorded, treating heading as true");
                head.array.clone()
            }
        };
        Ok(same_grid(head, wrap_heading(&corrected)))
    }
}

/// Degrees per second, from the continuous heading.
pub struct RateOfTurn {
    pub width: f64,
}

impl DerivedNode for RateOfTurn {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter("Rate Of Turn").requires("Heading Continuous", P)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let head = args.parameter("Heading Continuous")?;
        Ok(same_grid(head, rate_of_change(head, self.width)?))
    }
}

/// Feet per minute, from pressure altitude.
pub struct VerticalSpeed {
    pub width: f64,
}

impl DerivedNode for VerticalSpeed {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter("Vertical Speed").requires("Altitude STD", P)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let alt = args.parameter("Altitude STD")?;
        Ok(same_grid(alt, rate_of_change(alt, self.width)?.map(|v| v * 60.0)))
    }
}

/// Vertical speed smoothed for phase detection: a wider window and a
/// hysteresis band.
pub struct VerticalSpeedForFlightPhases {
    pub band: f64,
}

impl DerivedNode for VerticalSpeedForFlightPhases {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter("Vertical Speed For Flight Phases").requires("Altitude STD", P)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let alt = args.parameter("Altitude STD")?;
        let vs = rate_of_change(alt, 4.0)?.map(|v| v * 60.0);
        Ok(same_grid(alt, hysteresis(&vs, self.band)))
    }
}

/// A single parameter passed through a hysteresis band. Used for the
/// flight-phase variants of airspeed and altitude.
pub struct HysteresisParameter {
    pub name: &'static str,
    pub source: &'static str,
    pub band: f64,
}

impl HysteresisParameter {
    pub fn airspeed(band: f64) -> Self {
        Self { name: "Airspeed For Flight Phases", source: "Airspeed", band }
    }

    pub fn altitude(band: f64) -> Self {
        Self { name: "Altitude For Flight Phases", source: "Altitude STD", band }
    }
}

impl DerivedNode for HysteresisParameter {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter(self.name).requires(self.source, P)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let source = args.parameter(self.source)?;
        Ok(same_grid(source, hysteresis(&source.array, self.band)))
    }
}

/// Nautical miles along track since the start of the recording.
pub struct DistanceTravelled;

impl DerivedNode for DistanceTravelled {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter("Distance Travelled").requires("Groundspeed", P)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let gs = args.parameter("Groundspeed")?;
        // Knots integrated over seconds.
        let distance = integrate(&gs.array, gs.frequency, 1.0 / 3600.0, 0.0)?;
        Ok(same_grid(gs, distance))
    }
}

/// Acceleration perpendicular to the earth's surface, resolved from the
/// three body-axis accelerometers through pitch and roll.
pub struct AccelerationVertical;

impl DerivedNode for AccelerationVertical {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter("Acceleration Vertical")
            .requires("Acceleration Normal", P)
            .requires("Acceleration Lateral", P)
            .requires("Acceleration Longitudinal", P)
            .requires("Pitch", P)
            .requires("Roll", P)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let norm = args.parameter("Acceleration Normal")?;
        let lat = align(args.parameter("Acceleration Lateral")?, norm)?;
        let long = align(args.parameter("Acceleration Longitudinal")?, norm)?;
        let pitch = align(args.parameter("Pitch")?, norm)?;
        let roll = align(args.parameter("Roll")?, norm)?;

        let array: MaskedArray = (0..norm.len())
            .map(|i| {
                let pch = pitch.get(i)?.to_radians();
                let rol = roll.get(i)?.to_radians();
                let resolved_in_pitch = long.get(i)? * pch.sin() + norm.array.get(i)? * pch.cos();
                Some(resolved_in_pitch * rol.cos() - lat.get(i)? * rol.sin())
            })
            .collect();
        Ok(same_grid(norm, array))
    }
}

/// Mean of the available radio altimeters.
pub struct AltitudeRadio;

impl DerivedNode for AltitudeRadio {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter("Altitude Radio")
            .optional("Altitude Radio (A)", P)
            .optional("Altitude Radio (B)", P)
            .optional("Altitude Radio (C)", P)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let sensors = present_parameters(args, &["Altitude Radio (A)", "Altitude Radio (B)", "Altitude Radio (C)"])?;
        Ok(NodeOutput::Parameter(mean_of_aligned(&sensors)?))
    }
}

/// Height of the lowest point of the tail above the runway, from the radio
/// altitude, the pitch attitude and the aircraft's gear-to-tail distance.
pub struct AltitudeTail;

impl DerivedNode for AltitudeTail {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::parameter("Altitude Tail")
            .requires("Altitude Radio", P)
            .requires("Pitch", P)
            .requires("Dist Gear To Tail", ValueKind::Attribute)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let alt_rad = args.parameter("Altitude Radio")?;
        let pitch = align(args.parameter("Pitch")?, alt_rad)?;
        let gear_to_tail = args.attribute("Dist Gear To Tail")?.value.as_f64().ok_or_else(|| {
            DeriveError::Precondition("'Dist Gear To Tail' must be a distance in feet".into())
        })?;
        let array = alt_rad.array.zip_with(&pitch, |alt, pch| alt - pch.to_radians().sin() * gear_to_tail);
        Ok(same_grid(alt_rad, array))
    }
}

/// Sample-wise reduction (mean, max or min) across the recorded engines.
pub struct EngineN1 {
    pub name: &'static str,
    pub reduce: fn(&[f64]) -> f64,
}

const ENGINE_N1: [&str; 4] = ["Eng (1) N1", "Eng (2) N1", "Eng (3) N1", "Eng (4) N1"];

impl EngineN1 {
    pub fn average() -> Self {
        Self { name: "Eng (*) N1 Avg", reduce: |v| v.iter().sum::<f64>() / v.len() as f64 }
    }

    pub fn maximum() -> Self {
        Self { name: "Eng (*) N1 Max", reduce: |v| v.iter().copied().fold(f64::NEG_INFINITY, f64::max) }
    }

    pub fn minimum() -> Self {
        Self { name: "Eng (*) N1 Min", reduce: |v| v.iter().copied().fold(f64::INFINITY, f64::min) }
    }
}

impl DerivedNode for EngineN1 {
    fn descriptor(&self) -> NodeDescriptor {
        ENGINE_N1.iter().fold(NodeDescriptor::parameter(self.name), |d, eng| d.optional(*eng, P))
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let engines = present_parameters(args, &ENGINE_N1)?;
        Ok(NodeOutput::Parameter(combine_aligned(&engines, self.reduce)?))
    }
}

fn same_grid(source: &Parameter, array: MaskedArray) -> NodeOutput {
    NodeOutput::Parameter(Series::new(array, source.frequency, source.offset))
}

fn present_parameters<'a>(args: &DeriveArgs<'a>, names: &[&str]) -> Result<Vec<&'a Parameter>, DeriveError> {
    let mut present = Vec::with_capacity(names.len());
    for name in names {
        if let Some(p) = args.opt_parameter(name)? {
            present.push(p);
        }
    }
    Ok(present)
}
