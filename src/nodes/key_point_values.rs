//! key_point_values.rs
//! KPVs read off a parameter at each instance of a KTI.

use crate::library::value_at;
use crate::node::{DeriveArgs, DeriveError, DerivedNode, NodeDescriptor, NodeOutput};
use crate::store::{EventSet, KeyPointValue, ValueKind};

/// `parameter` sampled at every `instant`, e.g. "Gross Weight At Liftoff".
///
/// KTI indices are moved onto the parameter's grid and interpolated there.
/// Instances that land on masked data are skipped.
pub struct ValueAtInstant {
    pub name: &'static str,
    pub parameter: &'static str,
    pub instant: &'static str,
}

impl ValueAtInstant {
    pub const fn new(name: &'static str, parameter: &'static str, instant: &'static str) -> Self {
        Self { name, parameter, instant }
    }
}

/// Every value-at-instant KPV in the standard set.
pub const VALUES_AT_INSTANTS: [ValueAtInstant; 8] = [
    ValueAtInstant::new("Gross Weight At Liftoff", "Gross Weight", "Liftoff"),
    ValueAtInstant::new("Gross Weight At Touchdown", "Gross Weight", "Touchdown"),
    ValueAtInstant::new("Latitude At Liftoff", "Latitude", "Liftoff"),
    ValueAtInstant::new("Longitude At Liftoff", "Longitude", "Liftoff"),
    ValueAtInstant::new("Latitude At Touchdown", "Latitude", "Touchdown"),
    ValueAtInstant::new("Longitude At Touchdown", "Longitude", "Touchdown"),
    ValueAtInstant::new("Heading At Liftoff", "Heading True", "Liftoff"),
    ValueAtInstant::new("Heading At Touchdown", "Heading True", "Touchdown"),
];

impl DerivedNode for ValueAtInstant {
    fn descriptor(&self) -> NodeDescriptor {
        NodeDescriptor::key_point_values(self.name)
            .requires(self.parameter, ValueKind::Parameter)
            .requires(self.instant, ValueKind::KeyTimeInstances)
    }

    fn derive(&self, args: &DeriveArgs<'_>) -> Result<NodeOutput, DeriveError> {
        let param = args.parameter(self.parameter)?;
        let instants = args.key_time_instances(self.instant)?;

        let items = instants
            .items
            .iter()
            .filter_map(|kti| {
                let index = instants.index_on(kti.index, param.frequency, param.offset);
                value_at(&param.array, index).map(|value| KeyPointValue::new(self.name, index, value))
            })
            .collect();
        Ok(NodeOutput::KeyPointValues(EventSet::new(self.name, param.frequency, param.offset, items)))
    }
}
