//! Build a table of fuel costs and CO2 content for the fuels used by a set of resources.
//!
//! Each distinct fuel key used by the resources gets exactly one row. The cost of a fuel is its AEO
//! price (converted to the target dollar year), plus CCS and carbon tax adjustments where these
//! apply. Resources which do not burn fuel share a single `None` row with zero cost and emissions.
use crate::case::CaseSettings;
use crate::fuel::{CombustionFuel, FuelKey};
use crate::input::FuelPriceTable;
use crate::resource::Resource;
use crate::units::{MoneyPerMMBtu, TonnesPerMMBtu};
use anyhow::{Context, Result};
use itertools::Itertools;
use std::collections::BTreeSet;

/// The number of decimal places costs are rounded to
const COST_DECIMALS: i32 = 2;

/// The number of decimal places CO2 content is rounded to
const CO2_DECIMALS: i32 = 6;

/// The cost and CO2 content of a fuel
#[derive(Clone, Debug, PartialEq)]
pub struct FuelCost {
    /// The fuel
    pub fuel: FuelKey,
    /// Cost per MMBtu, in the target dollar year
    pub cost_per_mmbtu: MoneyPerMMBtu,
    /// Tonnes of CO2 emitted per MMBtu
    pub co2_content: TonnesPerMMBtu,
}

impl FuelCost {
    /// The row for resources which do not burn fuel
    fn no_fuel() -> Self {
        Self {
            fuel: FuelKey::NoFuel,
            cost_per_mmbtu: MoneyPerMMBtu(0.0),
            co2_content: TonnesPerMMBtu(0.0),
        }
    }
}

/// Fuel costs, with one row per fuel key, sorted by key with `None` last
#[derive(Clone, Debug, PartialEq)]
pub struct FuelCostTable(Vec<FuelCost>);

impl FuelCostTable {
    /// Iterate over the rows of the table
    pub fn iter(&self) -> impl Iterator<Item = &FuelCost> {
        self.0.iter()
    }

    /// Get the row for a fuel key
    pub fn get(&self, fuel: &FuelKey) -> Option<&FuelCost> {
        self.0.iter().find(|row| &row.fuel == fuel)
    }

    /// The number of rows
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty (never the case for a built table)
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Build the fuel cost table for a set of resources.
///
/// # Arguments
///
/// * `prices` - AEO fuel prices for the configured edition
/// * `resources` - The resources, labelled with fuel keys
/// * `settings` - Settings for the case and period
///
/// # Returns
///
/// One row for each distinct fuel key used by `resources`, plus a `None` row, or an error if any
/// fuel cannot be priced.
pub fn build_fuel_cost_table(
    prices: &FuelPriceTable,
    resources: &[Resource],
    settings: &CaseSettings,
) -> Result<FuelCostTable> {
    let fuels: BTreeSet<_> = resources
        .iter()
        .filter_map(|resource| resource.fuel.combustion())
        .collect();

    let mut rows: Vec<_> = fuels
        .into_iter()
        .map(|fuel| fuel_cost(prices, fuel, settings))
        .try_collect()?;
    rows.push(FuelCost::no_fuel());

    Ok(FuelCostTable(rows))
}

/// Calculate the cost and CO2 content for a single combustion fuel
fn fuel_cost(
    prices: &FuelPriceTable,
    fuel: &CombustionFuel,
    settings: &CaseSettings,
) -> Result<FuelCost> {
    let base_fuel = fuel.base_fuel();
    let price = base_fuel_price(prices, fuel, settings)?;
    let base_co2 = *settings
        .fuel_emission_factors
        .get(base_fuel)
        .with_context(|| format!("No emission factor given for fuel {base_fuel} (used by {fuel})"))?;

    let (mut cost, co2) = if fuel.ccs.is_some() {
        let capture_rate = *settings.ccs_capture_rate.get(&fuel.fuel).with_context(|| {
            format!("CCS fuel {} (used by {fuel}) has no entry in ccs_capture_rate", fuel.fuel)
        })?;
        let adder = settings
            .ccs_cost_adder
            .get(&fuel.fuel)
            .copied()
            .unwrap_or_default();
        let disposal = settings.ccs_disposal_cost * (base_co2 * capture_rate);

        (price + adder + disposal, base_co2 * capture_rate.complement())
    } else {
        (price, base_co2)
    };

    if let Some(carbon_tax) = settings.carbon_tax {
        cost += carbon_tax * co2;
    }

    Ok(FuelCost {
        fuel: FuelKey::Combustion(fuel.clone()),
        cost_per_mmbtu: cost.round_to(COST_DECIMALS),
        co2_content: co2.round_to(CO2_DECIMALS),
    })
}

/// Look up the AEO price of the base fuel burned, in the target dollar year
fn base_fuel_price(
    prices: &FuelPriceTable,
    fuel: &CombustionFuel,
    settings: &CaseSettings,
) -> Result<MoneyPerMMBtu> {
    let base_fuel = fuel.base_fuel();
    let region = settings
        .eia_series_region_names
        .get(&fuel.region)
        .with_context(|| format!("AEO region {} has no entry in eia_series_region_names", fuel.region))?;
    let scenario = settings
        .eia_series_scenario_names
        .get(&fuel.scenario)
        .with_context(|| {
            format!("Scenario {} has no entry in eia_series_scenario_names", fuel.scenario)
        })?;
    let fuel_name = settings
        .eia_series_fuel_names
        .get(base_fuel)
        .with_context(|| format!("Fuel {base_fuel} has no entry in eia_series_fuel_names"))?;

    let price = prices
        .get(region, scenario, fuel_name, settings.model_year)
        .with_context(|| {
            format!(
                "No price found for fuel key {fuel} (region {region}, scenario {scenario}, \
                fuel {fuel_name}, year {})",
                settings.model_year
            )
        })?;

    Ok(settings.price_in_target_dollars(price))
}
