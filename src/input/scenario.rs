//! Code for reading the scenario definitions table for a case.
//!
//! The table has `case_id` and `year` columns, followed by any number of override columns. Each
//! override column names either a scalar settings key (e.g. `carbon_tax`) or an entry in a table of
//! settings, written as `<table>.<key>` (e.g. `aeo_fuel_scenarios.naturalgas`). Empty cells leave
//! the base value from `case_settings.toml` unchanged.
use super::{input_err_msg, read_toml};
use crate::case::{CASE_SETTINGS_FILE_NAME, CaseID, CaseSettings, ScenarioSettingsMap};
use anyhow::{Context, Result, bail, ensure};
use csv::StringRecord;
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use std::path::Path;

const SCENARIO_DEFINITIONS_FILE_NAME: &str = "scenario_definitions.csv";

/// Scalar settings which may be overridden for a scenario
const SCALAR_OVERRIDE_KEYS: [&str; 6] = [
    "eia_aeo_year",
    "aeo_usd_year",
    "ccs_disposal_cost",
    "carbon_tax",
    "target_usd_year",
    "inflation_rate",
];

/// Tables of settings whose entries may be overridden for a scenario
const TABLE_OVERRIDE_KEYS: [&str; 4] = [
    "aeo_fuel_scenarios",
    "fuel_emission_factors",
    "ccs_capture_rate",
    "ccs_cost_adder",
];

/// A settings value named by the header of an override column
#[derive(Debug, PartialEq)]
enum OverrideKey {
    /// A top-level value
    Scalar(String),
    /// An entry in a table of settings
    TableEntry { table: String, key: String },
}

impl OverrideKey {
    fn parse(header: &str) -> Result<Self> {
        if let Some((table, key)) = header.split_once('.') {
            ensure!(
                TABLE_OVERRIDE_KEYS.contains(&table),
                "Cannot override entries of {table}. Valid tables are: {}",
                TABLE_OVERRIDE_KEYS.join(", ")
            );
            ensure!(!key.is_empty(), "Missing key in override column {header}");

            return Ok(Self::TableEntry {
                table: table.to_string(),
                key: key.to_string(),
            });
        }

        ensure!(
            SCALAR_OVERRIDE_KEYS.contains(&header),
            "Cannot override setting {header}. Valid settings are: {}",
            SCALAR_OVERRIDE_KEYS.join(", ")
        );

        Ok(Self::Scalar(header.to_string()))
    }
}

/// Convert the contents of a CSV cell to a TOML value, inferring its type
fn parse_override_value(s: &str) -> toml::Value {
    if let Ok(value) = s.parse::<i64>() {
        toml::Value::Integer(value)
    } else if let Ok(value) = s.parse::<f64>() {
        toml::Value::Float(value)
    } else {
        toml::Value::String(s.to_string())
    }
}

/// Apply overrides to a copy of the base settings table
fn apply_overrides<'a, I>(base: &toml::Table, overrides: I) -> Result<toml::Table>
where
    I: Iterator<Item = (&'a OverrideKey, &'a str)>,
{
    let mut table = base.clone();
    for (key, value) in overrides.filter(|(_, value)| !value.is_empty()) {
        let value = parse_override_value(value);
        match key {
            OverrideKey::Scalar(key) => {
                table.insert(key.clone(), value);
            }
            OverrideKey::TableEntry {
                table: table_name,
                key,
            } => {
                table
                    .entry(table_name.clone())
                    .or_insert_with(|| toml::Value::Table(toml::Table::new()))
                    .as_table_mut()
                    .with_context(|| format!("Setting {table_name} must be a table"))?
                    .insert(key.clone(), value);
            }
        }
    }

    Ok(table)
}

/// Deserialise and validate settings for a single period
fn settings_from_table(table: toml::Table, year: u32) -> Result<CaseSettings> {
    let mut settings: CaseSettings = toml::Value::Table(table).try_into()?;
    settings.model_year = year;
    settings.validate()?;

    Ok(settings)
}

/// Read the settings for every scenario and period of a case.
///
/// # Arguments
///
/// * `case_dir` - Folder containing case input files
///
/// # Returns
///
/// The settings for each scenario and period, or an error.
pub fn read_scenario_settings(case_dir: &Path) -> Result<ScenarioSettingsMap> {
    let base: toml::Table = read_toml(&case_dir.join(CASE_SETTINGS_FILE_NAME))?;

    let file_path = case_dir.join(SCENARIO_DEFINITIONS_FILE_NAME);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(&file_path)
        .with_context(|| input_err_msg(&file_path))?;
    let headers = reader
        .headers()
        .with_context(|| input_err_msg(&file_path))?
        .clone();
    let records: Vec<StringRecord> = reader
        .records()
        .try_collect()
        .with_context(|| input_err_msg(&file_path))?;

    read_scenario_settings_from_records(&base, &headers, records.iter())
        .with_context(|| input_err_msg(&file_path))
}

/// Build settings for each scenario from the rows of the scenario definitions table
fn read_scenario_settings_from_records<'a, I>(
    base: &toml::Table,
    headers: &StringRecord,
    records: I,
) -> Result<ScenarioSettingsMap>
where
    I: Iterator<Item = &'a StringRecord>,
{
    ensure!(
        headers.get(0) == Some("case_id") && headers.get(1) == Some("year"),
        "The first two columns must be case_id and year"
    );
    let override_keys: Vec<_> = headers.iter().skip(2).map(OverrideKey::parse).try_collect()?;

    let mut map = IndexMap::new();
    for record in records {
        let case_id: CaseID = record
            .get(0)
            .filter(|id| !id.is_empty())
            .context("Missing case_id")?
            .into();
        let year_str = record.get(1).unwrap_or_default();
        let year: u32 = year_str
            .parse()
            .with_context(|| format!("Invalid year for case {case_id}: {year_str}"))?;

        let overrides = override_keys.iter().zip(record.iter().skip(2));
        let table = apply_overrides(base, overrides)?;
        let settings = settings_from_table(table, year)
            .with_context(|| format!("Invalid settings for case {case_id} in year {year}"))?;

        debug!("Loaded settings for case {case_id} in year {year}");
        if map.insert((case_id.clone(), year), settings).is_some() {
            bail!("Scenario for case {case_id} in year {year} is defined more than once");
        }
    }

    ensure!(!map.is_empty(), "No scenarios defined");

    Ok(ScenarioSettingsMap::new(map))
}
