//! Generating resources and the fuel they consume.
use crate::fuel::FuelKey;
use crate::id::define_id_type;

define_id_type! {RegionID}
define_id_type! {ResourceID}

/// A generating resource within a model region
#[derive(Clone, Debug, PartialEq)]
pub struct Resource {
    /// The model region the resource is located in (e.g. "CA_N")
    pub region: RegionID,
    /// The name of the resource (e.g. "natural_gas_fired_combined_cycle")
    pub name: ResourceID,
    /// The technology of the resource (e.g. "Natural Gas Fired Combined Cycle")
    pub technology: String,
    /// The fuel burned by the resource, if any
    pub fuel: FuelKey,
}
