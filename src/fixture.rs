//! Fixtures for tests

use crate::case::CaseSettings;
use crate::fuel::FuelKey;
use crate::input::FuelPriceTable;
use crate::resource::Resource;
use crate::units::MoneyPerMMBtu;
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Base settings for a small case with two AEO regions
pub const CASE_SETTINGS_TOML: &str = r#"
eia_aeo_year = 2020
aeo_usd_year = 2019
ccs_disposal_cost = 10.0
no_fuel_technologies = ["Batteries", "Wind", "Solar"]

[eia_series_region_names]
pacific = "PCF"
south_atlantic = "SOATL"

[aeo_fuel_region_map]
pacific = ["CA_N", "CA_S"]
south_atlantic = ["S_VACA", "S_C_TVA"]

[eia_series_fuel_names]
coal = "STC"
naturalgas = "NG"
uranium = "U"
distillate = "DFO"

[eia_series_scenario_names]
reference = "REF2020"
high_resource = "HIGHOGS"

[aeo_fuel_scenarios]
coal = "reference"
naturalgas = "reference"
uranium = "reference"
distillate = "high_resource"

[tech_fuel_maps]
"Conventional Steam Coal" = "coal"
"Natural Gas Fired" = "naturalgas"
"Nuclear" = "uranium"
"Petroleum Liquids" = "distillate"

[ccs_fuel_map]
"Natural Gas Fired Combined Cycle with CCS" = "naturalgas_ccs90"
"Coal with CCS" = "coal_ccs90"

[ccs_capture_rate]
naturalgas_ccs90 = 0.9
coal_ccs90 = 0.9

[fuel_emission_factors]
coal = 0.09552
naturalgas = 0.05306
uranium = 0.0
distillate = 0.07315
"#;

#[fixture]
pub fn case_settings() -> CaseSettings {
    let mut settings: CaseSettings = toml::from_str(CASE_SETTINGS_TOML).unwrap();
    settings.model_year = 2030;
    settings
}

#[fixture]
pub fn fuel_prices() -> FuelPriceTable {
    let mut prices = FuelPriceTable::default();
    for (region, scenario, fuel, price) in [
        ("PCF", "REF2020", "NG", 3.58),
        ("PCF", "REF2020", "U", 0.71),
        ("PCF", "REF2020", "STC", 1.95),
        ("PCF", "HIGHOGS", "NG", 2.95),
        ("SOATL", "REF2020", "STC", 2.05),
        ("SOATL", "HIGHOGS", "DFO", 14.2),
    ] {
        prices
            .insert(region, scenario, fuel, 2030, MoneyPerMMBtu(price))
            .unwrap();
    }

    prices
}

/// Create a resource with the given fuel
pub fn resource(region: &str, name: &str, fuel: FuelKey) -> Resource {
    Resource {
        region: region.into(),
        name: name.into(),
        technology: name.replace('_', " "),
        fuel,
    }
}
