//! The module responsible for writing output data to disk.
use crate::case::CaseID;
use crate::fuel_cost::FuelCostTable;
use crate::resource::Resource;
use crate::units::{MoneyPerMMBtu, TonnesPerMMBtu};
use anyhow::{Context, Result, ensure};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub mod metadata;
use metadata::write_metadata;

/// The output file name for fuel costs
const FUEL_COSTS_FILE_NAME: &str = "fuel_costs.csv";

/// The output file name for labelled resources
const RESOURCES_FILE_NAME: &str = "resources.csv";

/// Get the default output directory for the case.
///
/// # Arguments
///
/// * `case_dir` - Folder containing case input files
/// * `results_root` - Folder containing the results of all cases
pub fn get_output_dir(case_dir: &Path, results_root: PathBuf) -> Result<PathBuf> {
    // Get the case name from the dir path. This ends up being convoluted because we need to check
    // for all possible errors. Ugh.
    let case_dir = case_dir
        .canonicalize() // canonicalise in case the user has specified "."
        .context("Could not resolve path to case")?;

    let case_name = case_dir
        .file_name()
        .context("Case cannot be in root folder")?
        .to_str()
        .context("Invalid chars in case dir name")?;

    // Construct path
    Ok([results_root, case_name.into()].iter().collect())
}

/// Get the output directory for a single scenario and period, within the case output directory
pub fn get_period_output_dir(output_dir: &Path, case_id: &CaseID, year: u32) -> PathBuf {
    output_dir.join(format!("{case_id}_{year}"))
}

/// Create a new output directory for the case, deleting the old one if allowed.
///
/// # Arguments
///
/// * `output_dir` - The folder to create
/// * `allow_overwrite` - Whether an existing, non-empty folder may be deleted first
///
/// # Returns
///
/// `true` if an existing folder was deleted, `false` otherwise, or an error.
pub fn create_output_directory(output_dir: &Path, allow_overwrite: bool) -> Result<bool> {
    // If the folder already exists, then delete it
    let overwrite = if let Ok(mut it) = fs::read_dir(output_dir) {
        if it.next().is_none() {
            // Folder exists and is empty: nothing to do
            return Ok(false);
        }

        ensure!(
            allow_overwrite,
            "Output folder already exists and is not empty. \
            Please delete the folder or pass the --overwrite command-line option."
        );

        fs::remove_dir_all(output_dir).context("Could not delete folder")?;
        true
    } else {
        false
    };

    // Try to create the folder
    fs::create_dir_all(output_dir)?;

    Ok(overwrite)
}

/// Represents a row in the fuel costs CSV file
#[derive(Serialize, Debug, PartialEq)]
struct FuelCostRow {
    #[serde(rename = "Fuel")]
    fuel: String,
    #[serde(rename = "Cost_per_MMBtu")]
    cost_per_mmbtu: MoneyPerMMBtu,
    #[serde(rename = "CO2_content_tons_per_MMBtu")]
    co2_content: TonnesPerMMBtu,
}

/// Represents a row in the resources CSV file
#[derive(Serialize, Debug, PartialEq)]
struct ResourceRow<'a> {
    region: &'a str,
    #[serde(rename = "Resource")]
    resource: &'a str,
    #[serde(rename = "Fuel")]
    fuel: String,
}

/// Write a fuel cost table to `fuel_costs.csv` in the given folder
pub fn write_fuel_costs(output_dir: &Path, table: &FuelCostTable) -> Result<()> {
    let file_path = output_dir.join(FUEL_COSTS_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)?;
    for row in table.iter() {
        writer.serialize(FuelCostRow {
            fuel: row.fuel.to_string(),
            cost_per_mmbtu: row.cost_per_mmbtu,
            co2_content: row.co2_content,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Write the resources, labelled with fuel keys, to `resources.csv` in the given folder
pub fn write_resources(output_dir: &Path, resources: &[Resource]) -> Result<()> {
    let file_path = output_dir.join(RESOURCES_FILE_NAME);
    let mut writer = csv::Writer::from_path(&file_path)?;
    for resource in resources {
        writer.serialize(ResourceRow {
            region: resource.region.as_str(),
            resource: resource.name.as_str(),
            fuel: resource.fuel.to_string(),
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// An object for writing the outputs of a run to file
pub struct DataWriter {
    output_path: PathBuf,
}

impl DataWriter {
    /// Create a new `DataWriter`, writing run metadata to the output folder.
    ///
    /// # Arguments
    ///
    /// * `output_path` - Folder where files will be saved
    /// * `case_path` - Path to the case being run
    pub fn create(output_path: &Path, case_path: &Path) -> Result<Self> {
        write_metadata(output_path, case_path).context("Failed to save metadata")?;

        Ok(Self {
            output_path: output_path.to_path_buf(),
        })
    }

    /// Write the results for a single scenario and period to their own subfolder.
    ///
    /// # Returns
    ///
    /// The path to the subfolder, or an error.
    pub fn write_period(
        &self,
        case_id: &CaseID,
        year: u32,
        resources: &[Resource],
        fuel_costs: &FuelCostTable,
    ) -> Result<PathBuf> {
        let period_dir = get_period_output_dir(&self.output_path, case_id, year);
        fs::create_dir_all(&period_dir)
            .with_context(|| format!("Could not create folder {}", period_dir.display()))?;
        write_resources(&period_dir, resources).context("Failed to write resources")?;
        write_fuel_costs(&period_dir, fuel_costs).context("Failed to write fuel costs")?;

        Ok(period_dir)
    }
}
