//! fuelcost builds tables of fuel costs and CO2 content for the generating resources of an energy
//! system model, from AEO fuel prices and emission factors.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod case;
pub mod cli;
pub mod example;
pub mod fuel;
pub mod fuel_cost;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod pipeline;
pub mod resource;
pub mod settings;
pub mod units;
pub mod year;

#[cfg(test)]
mod fixture;

/// Get the config folder for fuelcost
pub fn get_fuelcost_config_dir() -> PathBuf {
    let Some(mut config_dir) = dirs::config_dir() else {
        // No config dir on this platform, so use the current directory
        return PathBuf::default();
    };
    config_dir.push("fuelcost");
    config_dir
}
