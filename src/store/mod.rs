pub mod events;
pub mod flight;
pub mod masked;
pub mod parameter;
pub mod registry;
pub mod types;

pub use events::{rebase_index, EventSet, KeyPointValue, KeyTimeInstance, Section};
pub use flight::FlightInput;
pub use masked::MaskedArray;
pub use parameter::{Parameter, Series};
pub use registry::{NodeRegistry, RegisteredNode, RegistryError};
pub use types::{Attribute, AttributeValue, NodeId, NodeValue, Units, ValueKind};
