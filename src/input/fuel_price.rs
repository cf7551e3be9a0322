//! Code for reading AEO fuel prices from a CSV file.
use super::{input_err_msg, read_csv, try_insert};
use crate::units::MoneyPerMMBtu;
use anyhow::{Context, Result, ensure};
use log::debug;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const FUEL_PRICES_FILE_NAME: &str = "fuel_prices.csv";

/// A key for the fuel price table: EIA series names for region, scenario and fuel, plus year
type FuelPriceKey = (String, String, String, u32);

/// Fuel prices for a single AEO edition, keyed by EIA series names and year
#[derive(Debug, Default, PartialEq)]
pub struct FuelPriceTable(HashMap<FuelPriceKey, MoneyPerMMBtu>);

impl FuelPriceTable {
    /// Insert a price, returning an error if there is already one for this key
    pub fn insert(
        &mut self,
        region: &str,
        scenario: &str,
        fuel: &str,
        year: u32,
        price: MoneyPerMMBtu,
    ) -> Result<()> {
        let key = (region.into(), scenario.into(), fuel.into(), year);
        try_insert(&mut self.0, &key, price)
    }

    /// Get the price for the given EIA region, scenario and fuel names in a particular year
    pub fn get(&self, region: &str, scenario: &str, fuel: &str, year: u32) -> Option<MoneyPerMMBtu> {
        self.0
            .get(&(region.into(), scenario.into(), fuel.into(), year))
            .copied()
    }

    /// The number of prices in the table
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct FuelPriceRaw {
    aeo_year: u32,
    region: String,
    scenario: String,
    fuel: String,
    year: u32,
    price: MoneyPerMMBtu,
}

/// Read fuel prices for one AEO edition from the case directory.
///
/// # Arguments
///
/// * `case_dir` - Folder containing case input files
/// * `aeo_year` - The AEO edition to take prices from
///
/// # Returns
///
/// The fuel prices for the given AEO edition, or an error.
pub fn read_fuel_prices(case_dir: &Path, aeo_year: u32) -> Result<FuelPriceTable> {
    let file_path = case_dir.join(FUEL_PRICES_FILE_NAME);
    let fuel_prices_csv = read_csv(&file_path)?;
    read_fuel_prices_from_iter(fuel_prices_csv, aeo_year).with_context(|| input_err_msg(&file_path))
}

fn read_fuel_prices_from_iter<I>(iter: I, aeo_year: u32) -> Result<FuelPriceTable>
where
    I: Iterator<Item = FuelPriceRaw>,
{
    let mut table = FuelPriceTable::default();
    for raw in iter.filter(|raw| raw.aeo_year == aeo_year) {
        ensure!(
            raw.price.is_finite() && raw.price >= MoneyPerMMBtu(0.0),
            "Price for fuel {} in region {}, scenario {} and year {} must be a finite number \
            greater than or equal to zero",
            raw.fuel,
            raw.region,
            raw.scenario,
            raw.year
        );

        table
            .insert(&raw.region, &raw.scenario, &raw.fuel, raw.year, raw.price)
            .with_context(|| {
                format!(
                    "Price for fuel {} in region {}, scenario {} and year {} is given more than once",
                    raw.fuel, raw.region, raw.scenario, raw.year
                )
            })?;
    }

    ensure!(!table.is_empty(), "No fuel prices found for AEO year {aeo_year}");
    debug!("Read {} fuel prices for AEO year {aeo_year}", table.len());

    Ok(table)
}
