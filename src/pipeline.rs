//! Functionality for building the fuel cost tables for a case.
use crate::case::{CaseID, CaseSettings, ScenarioSettingsMap};
use crate::fuel_cost::{FuelCostTable, build_fuel_cost_table};
use crate::input::{DataSource, read_fuel_prices, resolve_generators};
use crate::output::DataWriter;
use crate::resource::Resource;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;

/// The outputs for a single scenario and period
#[derive(Debug, PartialEq)]
pub struct PeriodOutput {
    /// The resources, labelled with the fuels they burn
    pub resources: Vec<Resource>,
    /// The cost and CO2 content of each fuel
    pub fuel_costs: FuelCostTable,
}

/// Build the outputs for a single scenario and period.
///
/// # Arguments
///
/// * `source` - Where to read resource data from
/// * `settings` - Settings for the scenario and period
pub fn build_period(source: &DataSource, settings: &CaseSettings) -> Result<PeriodOutput> {
    let prices = read_fuel_prices(source.case_dir(), settings.eia_aeo_year)?;
    let resources = resolve_generators(source, settings)?;
    debug!("Resolved {} resources", resources.len());
    let fuel_costs = build_fuel_cost_table(&prices, &resources, settings)?;

    Ok(PeriodOutput {
        resources,
        fuel_costs,
    })
}

/// Build the outputs for the given periods of a scenario and write them to file.
///
/// # Arguments
///
/// * `case_path` - Folder containing case input files
/// * `scenarios` - Settings for every scenario and period of the case
/// * `case_id` - The scenario to run
/// * `years` - The periods to run
/// * `output_path` - The folder to which output files will be written
pub fn run(
    case_path: &Path,
    scenarios: &ScenarioSettingsMap,
    case_id: &CaseID,
    years: &[u32],
    output_path: &Path,
) -> Result<()> {
    let source = DataSource::new(case_path);
    let writer = DataWriter::create(output_path, case_path)?;

    for &year in years {
        info!("Case {case_id}, period {year}");
        let settings = scenarios.get(case_id, year)?;
        let output = build_period(&source, settings)
            .with_context(|| format!("Failed to build fuel costs for case {case_id} in {year}"))?;
        let period_dir =
            writer.write_period(case_id, year, &output.resources, &output.fuel_costs)?;
        info!(
            "Wrote {} fuel costs for {} resources to {}",
            output.fuel_costs.len(),
            output.resources.len(),
            period_dir.display()
        );
    }

    Ok(())
}

/// Build the outputs for every scenario and period of a case without writing them
pub fn validate(case_path: &Path, scenarios: &ScenarioSettingsMap) -> Result<()> {
    let source = DataSource::new(case_path);
    for (case_id, year, settings) in scenarios.iter() {
        build_period(&source, settings)
            .with_context(|| format!("Invalid inputs for case {case_id} in {year}"))?;
        debug!("Inputs for case {case_id} in {year} are valid");
    }

    Ok(())
}
