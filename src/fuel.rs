//! Fuel keys link a generating resource to a specific priced fuel.
//!
//! The textual form of a key is `<region>_<scenario>_<fuel_type>`, where the region is an AEO
//! fuel-price region (e.g. `pacific`), the scenario is an AEO scenario (e.g. `reference`) and the
//! fuel type is a base fuel (e.g. `naturalgas`) or a CCS variant of one (e.g. `naturalgas_ccs90`).
//! Resources which do not burn fuel have no key, written as `None`.
use crate::case::CaseSettings;
use crate::id::{IDCollection, define_id_type};
use anyhow::{Context, Result, ensure};
use indexmap::IndexSet;
use std::fmt;

define_id_type! {AeoRegionID}
define_id_type! {ScenarioID}
define_id_type! {FuelID}

/// The text used for resources without a fuel
pub const NO_FUEL: &str = "None";

/// The separator between a base fuel and its capture rate, e.g. `naturalgas_ccs90`
const CCS_SEPARATOR: &str = "_ccs";

/// The fuel used by a resource
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FuelKey {
    /// A combustion technology burning a priced fuel
    Combustion(CombustionFuel),
    /// The resource does not need fuel (e.g. batteries, hydro, wind)
    NoFuel,
}

/// A priced fuel for a particular region and AEO scenario
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CombustionFuel {
    /// The AEO fuel-price region
    pub region: AeoRegionID,
    /// The AEO scenario the price is taken from
    pub scenario: ScenarioID,
    /// The fuel type, possibly with a CCS suffix
    pub fuel: FuelID,
    /// Present if `fuel` is a CCS variant of a base fuel
    pub ccs: Option<CcsInfo>,
}

/// Information recovered from a CCS fuel type
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CcsInfo {
    /// The fossil fuel which is burned (e.g. `naturalgas`)
    pub base_fuel: FuelID,
    /// The capture percentage written in the suffix (e.g. 90)
    pub capture_percent: u32,
}

impl CcsInfo {
    /// Recover CCS information from a fuel type.
    ///
    /// # Returns
    ///
    /// `None` if the fuel type has no CCS suffix, otherwise the base fuel and capture percentage,
    /// or an error if the suffix is malformed.
    pub fn from_fuel(fuel: &FuelID) -> Result<Option<Self>> {
        let Some((base_fuel, percent)) = fuel.as_str().rsplit_once(CCS_SEPARATOR) else {
            return Ok(None);
        };

        ensure!(
            !base_fuel.is_empty(),
            "CCS fuel type {fuel} does not name a base fuel"
        );
        let capture_percent: u32 = percent.parse().ok().with_context(|| {
            format!("Unrecognised CCS suffix in fuel type {fuel}: expected e.g. '_ccs90'")
        })?;
        ensure!(
            (1..=100).contains(&capture_percent),
            "CCS capture percentage in fuel type {fuel} must be between 1 and 100"
        );

        Ok(Some(Self {
            base_fuel: base_fuel.into(),
            capture_percent,
        }))
    }
}

impl CombustionFuel {
    /// Create a new [`CombustionFuel`], recovering CCS information from the fuel type
    pub fn new(region: AeoRegionID, scenario: ScenarioID, fuel: FuelID) -> Result<Self> {
        let ccs = CcsInfo::from_fuel(&fuel)?;
        Ok(Self {
            region,
            scenario,
            fuel,
            ccs,
        })
    }

    /// The fuel which is actually burned, without any CCS suffix
    pub fn base_fuel(&self) -> &FuelID {
        self.ccs.as_ref().map_or(&self.fuel, |ccs| &ccs.base_fuel)
    }
}

impl fmt::Display for CombustionFuel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.region, self.scenario, self.fuel)
    }
}

impl fmt::Display for FuelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Combustion(fuel) => write!(f, "{fuel}"),
            Self::NoFuel => f.write_str(NO_FUEL),
        }
    }
}

impl FuelKey {
    /// Parse the textual form of a fuel key.
    ///
    /// An empty string or `None` gives [`FuelKey::NoFuel`]. Otherwise the longest known region is
    /// taken as a prefix, followed by the longest known scenario; the remainder is the fuel type.
    ///
    /// # Arguments
    ///
    /// * `s` - The fuel key
    /// * `vocabulary` - The known regions, scenarios and fuel types
    pub fn parse(s: &str, vocabulary: &FuelVocabulary) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() || s == NO_FUEL {
            return Ok(Self::NoFuel);
        }

        let (region, rest) = split_known_prefix(s, &vocabulary.regions)
            .with_context(|| format!("Fuel key {s} does not start with a known AEO region"))?;
        let (scenario, fuel) = split_known_prefix(rest, &vocabulary.scenarios).with_context(|| {
            format!("Fuel key {s} does not contain a known scenario after region {region}")
        })?;
        let fuel = vocabulary
            .fuels
            .get_id(fuel)
            .with_context(|| format!("Fuel key {s} contains unknown fuel type {fuel}"))?;

        Ok(Self::Combustion(CombustionFuel::new(
            region.clone(),
            scenario.clone(),
            fuel.clone(),
        )?))
    }

    /// The combustion fuel, if any
    pub fn combustion(&self) -> Option<&CombustionFuel> {
        match self {
            Self::Combustion(fuel) => Some(fuel),
            Self::NoFuel => None,
        }
    }
}

/// Find the longest ID in `ids` which, followed by `_`, is a prefix of `s`
fn split_known_prefix<'a, 'b, ID>(s: &'a str, ids: &'b IndexSet<ID>) -> Option<(&'b ID, &'a str)>
where
    ID: std::borrow::Borrow<str>,
{
    ids.iter()
        .filter_map(|id| {
            let rest = s.strip_prefix(id.borrow())?.strip_prefix('_')?;
            (!rest.is_empty()).then_some((id, rest))
        })
        .max_by_key(|(id, _)| id.borrow().len())
}

/// The region, scenario and fuel names which may appear in fuel keys
#[derive(Debug, Default, PartialEq)]
pub struct FuelVocabulary {
    /// AEO fuel-price regions
    pub regions: IndexSet<AeoRegionID>,
    /// AEO scenarios
    pub scenarios: IndexSet<ScenarioID>,
    /// Base and CCS fuel types
    pub fuels: IndexSet<FuelID>,
}

impl FuelVocabulary {
    /// Collect the vocabulary from case settings.
    ///
    /// Regions are the keys of `aeo_fuel_region_map`, scenarios the keys of
    /// `eia_series_scenario_names` (whether or not `aeo_fuel_scenarios` selects them) and fuels
    /// the keys of `eia_series_fuel_names` plus the CCS fuels in `ccs_fuel_map`.
    pub fn from_settings(settings: &CaseSettings) -> Self {
        Self {
            regions: settings.aeo_fuel_region_map.keys().cloned().collect(),
            scenarios: settings.eia_series_scenario_names.keys().cloned().collect(),
            fuels: settings
                .eia_series_fuel_names
                .keys()
                .chain(settings.ccs_fuel_map.values())
                .cloned()
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, case_settings};
    use rstest::{fixture, rstest};

    #[fixture]
    fn vocabulary(case_settings: CaseSettings) -> FuelVocabulary {
        FuelVocabulary::from_settings(&case_settings)
    }

    fn combustion(region: &str, scenario: &str, fuel: &str) -> FuelKey {
        FuelKey::Combustion(CombustionFuel::new(region.into(), scenario.into(), fuel.into()).unwrap())
    }

    #[rstest]
    #[case("", FuelKey::NoFuel)]
    #[case("None", FuelKey::NoFuel)]
    #[case(
        "pacific_reference_naturalgas",
        combustion("pacific", "reference", "naturalgas")
    )]
    #[case(
        "pacific_reference_naturalgas_ccs90",
        combustion("pacific", "reference", "naturalgas_ccs90")
    )]
    #[case(
        "south_atlantic_high_resource_coal",
        combustion("south_atlantic", "high_resource", "coal")
    )]
    fn parse_fuel_key_valid(
        vocabulary: FuelVocabulary,
        #[case] s: &str,
        #[case] expected: FuelKey,
    ) {
        assert_eq!(FuelKey::parse(s, &vocabulary).unwrap(), expected);
    }

    #[rstest]
    #[case(
        "atlantis_reference_naturalgas",
        "Fuel key atlantis_reference_naturalgas does not start with a known AEO region"
    )]
    #[case(
        "pacific_imaginary_naturalgas",
        "Fuel key pacific_imaginary_naturalgas does not contain a known scenario after region pacific"
    )]
    #[case(
        "pacific_reference_unobtainium",
        "Fuel key pacific_reference_unobtainium contains unknown fuel type unobtainium"
    )]
    #[case(
        "pacific_reference",
        "Fuel key pacific_reference does not contain a known scenario after region pacific"
    )]
    fn parse_fuel_key_invalid(
        vocabulary: FuelVocabulary,
        #[case] s: &str,
        #[case] msg: &str,
    ) {
        assert_error!(FuelKey::parse(s, &vocabulary), msg);
    }

    #[rstest]
    fn parse_fuel_key_unselected_scenario(mut case_settings: CaseSettings) {
        // No fuel selects the high resource scenario now, but it can still be priced
        case_settings
            .aeo_fuel_scenarios
            .insert("distillate".into(), "reference".into());
        let vocabulary = FuelVocabulary::from_settings(&case_settings);
        assert_eq!(
            FuelKey::parse("pacific_high_resource_naturalgas", &vocabulary).unwrap(),
            combustion("pacific", "high_resource", "naturalgas")
        );
    }

    #[test]
    fn display_round_trip() {
        let key = combustion("south_atlantic", "high_resource", "coal_ccs90");
        assert_eq!(key.to_string(), "south_atlantic_high_resource_coal_ccs90");
        assert_eq!(FuelKey::NoFuel.to_string(), "None");
    }

    #[test]
    fn no_fuel_sorts_last() {
        let mut keys = vec![FuelKey::NoFuel, combustion("pacific", "reference", "coal")];
        keys.sort();
        assert_eq!(keys.last(), Some(&FuelKey::NoFuel));
    }

    #[rstest]
    #[case("naturalgas", None)]
    #[case("naturalgas_ccs90", Some(("naturalgas", 90)))]
    #[case("coal_ccs30", Some(("coal", 30)))]
    fn ccs_info_from_fuel_valid(#[case] fuel: &str, #[case] expected: Option<(&str, u32)>) {
        let expected = expected.map(|(base_fuel, capture_percent)| CcsInfo {
            base_fuel: base_fuel.into(),
            capture_percent,
        });
        assert_eq!(CcsInfo::from_fuel(&fuel.into()).unwrap(), expected);
    }

    #[rstest]
    #[case("naturalgas_ccs", "Unrecognised CCS suffix in fuel type naturalgas_ccs: expected e.g. '_ccs90'")]
    #[case("naturalgas_ccsxx", "Unrecognised CCS suffix in fuel type naturalgas_ccsxx: expected e.g. '_ccs90'")]
    #[case("naturalgas_ccs0", "CCS capture percentage in fuel type naturalgas_ccs0 must be between 1 and 100")]
    #[case("_ccs90", "CCS fuel type _ccs90 does not name a base fuel")]
    fn ccs_info_from_fuel_invalid(#[case] fuel: &str, #[case] msg: &str) {
        assert_error!(CcsInfo::from_fuel(&fuel.into()), msg);
    }
}
