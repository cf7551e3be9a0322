//! Read and validate the settings for a case from `case_settings.toml`.
//!
//! The settings select which AEO edition, scenarios and dollar year fuel prices are taken from,
//! how technologies map onto fuels and how emissions from each fuel are accounted for. Per-period
//! values are obtained by applying overrides from the scenario definitions table (see
//! [`crate::input::scenario`]).
use crate::fuel::{AeoRegionID, CcsInfo, FuelID, ScenarioID};
use crate::resource::RegionID;
use crate::units::{Dimensionless, MoneyPerMMBtu, MoneyPerTonne, TonnesPerMMBtu};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use serde::Deserialize;
use std::collections::HashMap;

/// The name of the file containing the base settings for a case
pub const CASE_SETTINGS_FILE_NAME: &str = "case_settings.toml";

/// Settings for a single case and period.
///
/// NOTE: If you add a scalar field to this struct which should be overridable per period, you must
/// also add it to `SCALAR_OVERRIDE_KEYS` in the `scenario` input module.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct CaseSettings {
    /// The period for which these settings apply (from the scenario definitions table)
    #[serde(skip)]
    pub model_year: u32,
    /// EIA series names for each AEO fuel-price region
    pub eia_series_region_names: IndexMap<AeoRegionID, String>,
    /// The model regions contained within each AEO fuel-price region
    pub aeo_fuel_region_map: IndexMap<AeoRegionID, Vec<RegionID>>,
    /// EIA series names for each fuel type
    pub eia_series_fuel_names: IndexMap<FuelID, String>,
    /// The edition of the Annual Energy Outlook to take prices from
    pub eia_aeo_year: u32,
    /// EIA series names for each AEO scenario
    pub eia_series_scenario_names: IndexMap<ScenarioID, String>,
    /// The AEO scenario used for each fuel type
    pub aeo_fuel_scenarios: IndexMap<FuelID, ScenarioID>,
    /// The dollar year of AEO fuel prices
    pub aeo_usd_year: u32,
    /// Fuel types for technologies, keyed by a (case-insensitive) technology name fragment
    pub tech_fuel_maps: IndexMap<String, FuelID>,
    /// CCS fuel types for technologies, keyed by a (case-insensitive) technology name fragment
    pub ccs_fuel_map: IndexMap<String, FuelID>,
    /// (Case-insensitive) name fragments of technologies which do not burn fuel
    #[serde(default)]
    pub no_fuel_technologies: Vec<String>,
    /// The proportion of CO2 captured for each CCS fuel type
    pub ccs_capture_rate: IndexMap<FuelID, Dimensionless>,
    /// The cost of transporting and storing captured CO2
    pub ccs_disposal_cost: MoneyPerTonne,
    /// CO2 emitted per MMBtu of each base fuel
    pub fuel_emission_factors: IndexMap<FuelID, TonnesPerMMBtu>,
    /// A tax applied to each tonne of CO2 emitted
    #[serde(default)]
    pub carbon_tax: Option<MoneyPerTonne>,
    /// Additional non-fuel costs for CCS fuel types
    #[serde(default)]
    pub ccs_cost_adder: IndexMap<FuelID, MoneyPerMMBtu>,
    /// The dollar year to express costs in. Defaults to `aeo_usd_year`.
    #[serde(default)]
    pub target_usd_year: Option<u32>,
    /// Annual inflation rate used to convert between dollar years
    #[serde(default)]
    pub inflation_rate: Option<Dimensionless>,
}

/// Check that all the emission factors are valid
fn check_emission_factors(factors: &IndexMap<FuelID, TonnesPerMMBtu>) -> Result<()> {
    for (fuel, factor) in factors {
        ensure!(
            factor.is_finite() && *factor >= TonnesPerMMBtu(0.0),
            "Emission factor for fuel {fuel} must be a finite number greater than or equal to zero"
        );
    }

    Ok(())
}

/// Check that all the capture rates are valid proportions
fn check_capture_rates(rates: &IndexMap<FuelID, Dimensionless>) -> Result<()> {
    for (fuel, rate) in rates {
        ensure!(
            *rate >= Dimensionless(0.0) && *rate <= Dimensionless(1.0),
            "Capture rate for fuel {fuel} must be between 0 and 1"
        );
    }

    Ok(())
}

/// Check that a cost per tonne of CO2 is valid
fn check_cost_per_tonne(name: &str, value: MoneyPerTonne) -> Result<()> {
    ensure!(
        value.is_finite() && value >= MoneyPerTonne(0.0),
        "{name} must be a finite number greater than or equal to zero"
    );

    Ok(())
}

/// The largest allowed difference between a capture rate and the percentage in its fuel type
const CAPTURE_RATE_TOLERANCE: f64 = 1e-6;

/// Check that each CCS fuel type is well formed and has the information needed to cost it
fn check_ccs_fuels(settings: &CaseSettings) -> Result<()> {
    for fuel in settings.ccs_fuel_map.values() {
        let ccs = CcsInfo::from_fuel(fuel)?
            .with_context(|| format!("Fuel {fuel} in ccs_fuel_map has no CCS suffix"))?;
        ensure!(
            settings.ccs_capture_rate.contains_key(fuel),
            "CCS fuel {fuel} has no entry in ccs_capture_rate"
        );
        ensure!(
            settings.aeo_fuel_scenarios.contains_key(&ccs.base_fuel),
            "Base fuel {} of CCS fuel {fuel} has no entry in aeo_fuel_scenarios",
            ccs.base_fuel
        );
    }

    for (fuel, rate) in &settings.ccs_capture_rate {
        let Some(ccs) = CcsInfo::from_fuel(fuel)? else {
            continue;
        };
        let expected = f64::from(ccs.capture_percent) / 100.0;
        ensure!(
            (rate.value() - expected).abs() <= CAPTURE_RATE_TOLERANCE,
            "Capture rate for fuel {fuel} ({rate}) does not match the {}% given in its name",
            ccs.capture_percent
        );
    }

    for (fuel, adder) in &settings.ccs_cost_adder {
        ensure!(
            settings.ccs_capture_rate.contains_key(fuel),
            "ccs_cost_adder contains fuel {fuel}, which has no entry in ccs_capture_rate"
        );
        ensure!(
            adder.is_finite(),
            "ccs_cost_adder for fuel {fuel} must be a finite number"
        );
    }

    Ok(())
}

/// Check that every fuel, scenario and region referenced can be translated to an EIA series name
fn check_eia_series_names(settings: &CaseSettings) -> Result<()> {
    for fuel in settings.tech_fuel_maps.values() {
        ensure!(
            settings.aeo_fuel_scenarios.contains_key(fuel),
            "Fuel {fuel} in tech_fuel_maps has no entry in aeo_fuel_scenarios"
        );
    }

    for (fuel, scenario) in &settings.aeo_fuel_scenarios {
        ensure!(
            settings.eia_series_fuel_names.contains_key(fuel),
            "Fuel {fuel} has no entry in eia_series_fuel_names"
        );
        ensure!(
            settings.eia_series_scenario_names.contains_key(scenario),
            "Scenario {scenario} for fuel {fuel} has no entry in eia_series_scenario_names"
        );
    }

    for region in settings.aeo_fuel_region_map.keys() {
        ensure!(
            settings.eia_series_region_names.contains_key(region),
            "AEO region {region} has no entry in eia_series_region_names"
        );
    }

    Ok(())
}

/// Check that no model region is assigned to more than one AEO region
fn check_aeo_fuel_region_map(map: &IndexMap<AeoRegionID, Vec<RegionID>>) -> Result<()> {
    let mut seen = HashMap::new();
    for (aeo_region, regions) in map {
        for region in regions {
            if let Some(other) = seen.insert(region, aeo_region) {
                ensure!(
                    other == aeo_region,
                    "Region {region} appears in both AEO regions {other} and {aeo_region}"
                );
            }
        }
    }

    Ok(())
}

/// Check that dollar year conversion is fully specified
fn check_inflation(target_usd_year: Option<u32>, rate: Option<Dimensionless>) -> Result<()> {
    if let Some(rate) = rate {
        ensure!(
            rate.is_finite() && rate > Dimensionless(-1.0),
            "inflation_rate must be a finite number greater than -1"
        );
    }
    ensure!(
        target_usd_year.is_none() || rate.is_some(),
        "inflation_rate must be provided if target_usd_year is set"
    );

    Ok(())
}

impl CaseSettings {
    /// Validate settings after reading them in
    pub fn validate(&self) -> Result<()> {
        check_emission_factors(&self.fuel_emission_factors)?;
        check_capture_rates(&self.ccs_capture_rate)?;
        check_cost_per_tonne("ccs_disposal_cost", self.ccs_disposal_cost)?;
        if let Some(carbon_tax) = self.carbon_tax {
            check_cost_per_tonne("carbon_tax", carbon_tax)?;
        }
        check_ccs_fuels(self)?;
        check_eia_series_names(self)?;
        check_aeo_fuel_region_map(&self.aeo_fuel_region_map)?;
        check_inflation(self.target_usd_year, self.inflation_rate)?;

        Ok(())
    }

    /// Find the AEO fuel-price region containing a model region
    pub fn aeo_region_for(&self, region: &RegionID) -> Result<&AeoRegionID> {
        self.aeo_fuel_region_map
            .iter()
            .find(|(_, regions)| regions.contains(region))
            .map(|(aeo_region, _)| aeo_region)
            .with_context(|| format!("Region {region} is not listed in aeo_fuel_region_map"))
    }

    /// The dollar year in which costs are reported
    pub fn usd_year(&self) -> u32 {
        self.target_usd_year.unwrap_or(self.aeo_usd_year)
    }

    /// Convert a price from AEO dollars into the target dollar year
    pub fn price_in_target_dollars(&self, price: MoneyPerMMBtu) -> MoneyPerMMBtu {
        let Some(rate) = self.inflation_rate else {
            return price;
        };

        let years = i64::from(self.usd_year()) - i64::from(self.aeo_usd_year);
        #[allow(clippy::cast_possible_truncation)]
        let factor = (1.0 + rate.value()).powi(years as i32);
        price * Dimensionless(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, case_settings};
    use float_cmp::assert_approx_eq;
    use rstest::rstest;

    #[rstest]
    fn fixture_settings_are_valid(case_settings: CaseSettings) {
        case_settings.validate().unwrap();
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(0.05306, true)]
    #[case(-0.01, false)]
    #[case(f64::INFINITY, false)]
    #[case(f64::NAN, false)]
    fn check_emission_factors_works(#[case] value: f64, #[case] valid: bool) {
        let factors = IndexMap::from([("naturalgas".into(), TonnesPerMMBtu(value))]);
        assert_eq!(check_emission_factors(&factors).is_ok(), valid);
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(0.9, true)]
    #[case(1.0, true)]
    #[case(-0.1, false)]
    #[case(1.5, false)]
    #[case(f64::NAN, false)]
    fn check_capture_rates_works(#[case] value: f64, #[case] valid: bool) {
        let rates = IndexMap::from([("naturalgas_ccs90".into(), Dimensionless(value))]);
        assert_eq!(check_capture_rates(&rates).is_ok(), valid);
    }

    #[rstest]
    #[case(0.0, true)]
    #[case(50.0, true)]
    #[case(-1.0, false)]
    #[case(f64::INFINITY, false)]
    fn check_cost_per_tonne_works(#[case] value: f64, #[case] valid: bool) {
        assert_eq!(
            check_cost_per_tonne("carbon_tax", MoneyPerTonne(value)).is_ok(),
            valid
        );
    }

    #[rstest]
    fn ccs_fuel_without_capture_rate(mut case_settings: CaseSettings) {
        case_settings.ccs_capture_rate.shift_remove("naturalgas_ccs90");
        assert_error!(
            case_settings.validate(),
            "CCS fuel naturalgas_ccs90 has no entry in ccs_capture_rate"
        );
    }

    #[rstest]
    #[case(0.9, true)]
    #[case(0.5, false)]
    #[case(0.95, false)]
    fn ccs_capture_rate_matches_fuel_name(
        mut case_settings: CaseSettings,
        #[case] rate: f64,
        #[case] valid: bool,
    ) {
        case_settings
            .ccs_capture_rate
            .insert("naturalgas_ccs90".into(), Dimensionless(rate));
        assert_eq!(case_settings.validate().is_ok(), valid);
    }

    #[rstest]
    fn ccs_capture_rate_mismatch_message(mut case_settings: CaseSettings) {
        case_settings
            .ccs_capture_rate
            .insert("naturalgas_ccs90".into(), Dimensionless(0.5));
        assert_error!(
            case_settings.validate(),
            "Capture rate for fuel naturalgas_ccs90 (0.5) does not match the 90% given in its name"
        );
    }

    #[rstest]
    fn ccs_fuel_without_suffix(mut case_settings: CaseSettings) {
        case_settings
            .ccs_fuel_map
            .insert("Gas CCS".into(), "naturalgas".into());
        assert_error!(
            case_settings.validate(),
            "Fuel naturalgas in ccs_fuel_map has no CCS suffix"
        );
    }

    #[rstest]
    fn fuel_without_eia_name(mut case_settings: CaseSettings) {
        case_settings.eia_series_fuel_names.shift_remove("coal");
        assert_error!(
            case_settings.validate(),
            "Fuel coal has no entry in eia_series_fuel_names"
        );
    }

    #[rstest]
    fn region_in_two_aeo_regions(mut case_settings: CaseSettings) {
        case_settings
            .aeo_fuel_region_map
            .get_mut("south_atlantic")
            .unwrap()
            .push("CA_N".into());
        assert_error!(
            case_settings.validate(),
            "Region CA_N appears in both AEO regions pacific and south_atlantic"
        );
    }

    #[rstest]
    #[case(None, None, true)]
    #[case(None, Some(0.02), true)]
    #[case(Some(2024), Some(0.02), true)]
    #[case(Some(2024), None, false)]
    #[case(Some(2024), Some(-1.0), false)]
    fn check_inflation_works(
        #[case] target_usd_year: Option<u32>,
        #[case] rate: Option<f64>,
        #[case] valid: bool,
    ) {
        assert_eq!(
            check_inflation(target_usd_year, rate.map(Dimensionless)).is_ok(),
            valid
        );
    }

    #[rstest]
    fn aeo_region_for_works(case_settings: CaseSettings) {
        assert_eq!(
            case_settings.aeo_region_for(&"CA_S".into()).unwrap(),
            &AeoRegionID::new("pacific")
        );
        assert_error!(
            case_settings.aeo_region_for(&"ERCOT".into()),
            "Region ERCOT is not listed in aeo_fuel_region_map"
        );
    }

    #[rstest]
    fn price_in_target_dollars_no_inflation(case_settings: CaseSettings) {
        assert_eq!(
            case_settings.price_in_target_dollars(MoneyPerMMBtu(3.58)),
            MoneyPerMMBtu(3.58)
        );
    }

    #[rstest]
    fn price_in_target_dollars_with_inflation(mut case_settings: CaseSettings) {
        case_settings.aeo_usd_year = 2019;
        case_settings.target_usd_year = Some(2021);
        case_settings.inflation_rate = Some(Dimensionless(0.1));
        assert_eq!(case_settings.usd_year(), 2021);
        assert_approx_eq!(
            f64,
            case_settings
                .price_in_target_dollars(MoneyPerMMBtu(2.0))
                .value(),
            2.42
        );
    }
}
