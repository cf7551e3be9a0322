//! Code for resolving the generating resources of a case and labelling them with fuels.
use super::{input_err_msg, read_csv};
use crate::case::CaseSettings;
use crate::fuel::{CcsInfo, CombustionFuel, FuelID, FuelKey, FuelVocabulary};
use crate::resource::{RegionID, Resource, ResourceID};
use anyhow::{Context, Result, ensure};
use indexmap::IndexMap;
use itertools::Itertools;
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

const GENERATORS_FILE_NAME: &str = "generators.csv";

/// Where resource data for a case comes from
#[derive(Debug, Clone)]
pub struct DataSource {
    case_dir: PathBuf,
}

impl DataSource {
    /// Create a data source for the given case directory
    pub fn new<P: Into<PathBuf>>(case_dir: P) -> Self {
        Self {
            case_dir: case_dir.into(),
        }
    }

    /// The case directory
    pub fn case_dir(&self) -> &Path {
        &self.case_dir
    }

    fn generators_path(&self) -> PathBuf {
        self.case_dir.join(GENERATORS_FILE_NAME)
    }
}

#[derive(Debug, Deserialize, PartialEq)]
struct GeneratorRaw {
    region: String,
    #[serde(rename = "Resource")]
    resource: String,
    technology: String,
    #[serde(default, rename = "Fuel")]
    fuel: Option<String>,
}

/// Resolve the generating resources for a case.
///
/// # Arguments
///
/// * `source` - Where to read resource data from
/// * `settings` - Settings for the case and period
///
/// # Returns
///
/// The resources, each labelled with the fuel it burns (if any), or an error.
pub fn resolve_generators(source: &DataSource, settings: &CaseSettings) -> Result<Vec<Resource>> {
    let file_path = source.generators_path();
    let generators_csv = read_csv(&file_path)?;
    resolve_generators_from_iter(generators_csv, settings)
        .with_context(|| input_err_msg(&file_path))
}

fn resolve_generators_from_iter<I>(iter: I, settings: &CaseSettings) -> Result<Vec<Resource>>
where
    I: Iterator<Item = GeneratorRaw>,
{
    let vocabulary = FuelVocabulary::from_settings(settings);
    let mut seen = HashSet::new();

    iter.map(|raw| -> Result<_> {
        ensure!(
            !raw.region.is_empty(),
            "Resource {} has no region",
            raw.resource
        );
        ensure!(!raw.resource.is_empty(), "Empty resource name in region {}", raw.region);
        let region: RegionID = raw.region.into();
        let name: ResourceID = raw.resource.into();
        ensure!(
            seen.insert((region.clone(), name.clone())),
            "Resource {name} is defined more than once for region {region}"
        );

        let fuel = match raw.fuel.as_deref().filter(|fuel| !fuel.is_empty()) {
            Some(fuel) => FuelKey::parse(fuel, &vocabulary)
                .with_context(|| format!("Invalid fuel for resource {name} in region {region}"))?,
            None => label_fuel(&region, &raw.technology, settings)
                .with_context(|| format!("Could not label fuel for resource {name}"))?,
        };

        Ok(Resource {
            region,
            name,
            technology: raw.technology,
            fuel,
        })
    })
    .try_collect()
}

/// Find the first fuel in `map` whose key is contained in `technology`, ignoring case
fn match_technology<'a>(technology: &str, map: &'a IndexMap<String, FuelID>) -> Option<&'a FuelID> {
    let technology = technology.to_lowercase();
    map.iter()
        .find(|(fragment, _)| technology.contains(&fragment.to_lowercase()))
        .map(|(_, fuel)| fuel)
}

/// Whether `technology` contains one of the name fragments in `fragments`, ignoring case
fn is_no_fuel_technology(technology: &str, fragments: &[String]) -> bool {
    let technology = technology.to_lowercase();
    fragments
        .iter()
        .any(|fragment| technology.contains(&fragment.to_lowercase()))
}

/// Label a resource with the fuel its technology burns.
///
/// CCS technologies (`ccs_fuel_map`) are matched before other technologies (`tech_fuel_maps`).
/// Technologies matching neither must be listed in `no_fuel_technologies`, otherwise the fuel
/// cannot be determined and an error is returned.
///
/// # Arguments
///
/// * `region` - The model region of the resource
/// * `technology` - The resource's technology
/// * `settings` - Settings for the case and period
pub fn label_fuel(region: &RegionID, technology: &str, settings: &CaseSettings) -> Result<FuelKey> {
    let Some(fuel) = match_technology(technology, &settings.ccs_fuel_map)
        .or_else(|| match_technology(technology, &settings.tech_fuel_maps))
    else {
        ensure!(
            is_no_fuel_technology(technology, &settings.no_fuel_technologies),
            "Technology {technology} in region {region} matches no entry in ccs_fuel_map, \
            tech_fuel_maps or no_fuel_technologies"
        );
        debug!("Technology {technology} in region {region} does not use fuel");
        return Ok(FuelKey::NoFuel);
    };

    let aeo_region = settings.aeo_region_for(region)?;
    let ccs = CcsInfo::from_fuel(fuel)?;
    let base_fuel = ccs.as_ref().map_or(fuel, |ccs| &ccs.base_fuel);
    let scenario = settings
        .aeo_fuel_scenarios
        .get(base_fuel)
        .with_context(|| format!("Fuel {base_fuel} has no entry in aeo_fuel_scenarios"))?;

    Ok(FuelKey::Combustion(CombustionFuel::new(
        aeo_region.clone(),
        scenario.clone(),
        fuel.clone(),
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, case_settings};
    use rstest::rstest;
    use std::fs;
    use std::iter;
    use tempfile::tempdir;

    fn raw(region: &str, resource: &str, technology: &str, fuel: Option<&str>) -> GeneratorRaw {
        GeneratorRaw {
            region: region.into(),
            resource: resource.into(),
            technology: technology.into(),
            fuel: fuel.map(Into::into),
        }
    }

    #[rstest]
    #[case("CA_N", "Natural Gas Fired Combined Cycle", "pacific_reference_naturalgas")]
    #[case("CA_N", "natural gas fired combustion turbine", "pacific_reference_naturalgas")]
    #[case(
        "CA_S",
        "Natural Gas Fired Combined Cycle with CCS",
        "pacific_reference_naturalgas_ccs90"
    )]
    #[case("S_VACA", "Conventional Steam Coal", "south_atlantic_reference_coal")]
    #[case("S_VACA", "Petroleum Liquids", "south_atlantic_high_resource_distillate")]
    #[case("CA_N", "Batteries", "None")]
    #[case("ERCOT", "Onshore Wind Turbine", "None")]
    fn label_fuel_valid(
        case_settings: CaseSettings,
        #[case] region: &str,
        #[case] technology: &str,
        #[case] expected: &str,
    ) {
        let fuel = label_fuel(&region.into(), technology, &case_settings).unwrap();
        assert_eq!(fuel.to_string(), expected);
    }

    #[rstest]
    fn label_fuel_unmapped_region(case_settings: CaseSettings) {
        assert_error!(
            label_fuel(&"ERCOT".into(), "Nuclear", &case_settings),
            "Region ERCOT is not listed in aeo_fuel_region_map"
        );
    }

    #[rstest]
    #[case("Natural Gas Steam Turbine")]
    #[case("Geothermal")]
    fn label_fuel_unmapped_technology(case_settings: CaseSettings, #[case] technology: &str) {
        assert_error!(
            label_fuel(&"CA_N".into(), technology, &case_settings),
            format!(
                "Technology {technology} in region CA_N matches no entry in ccs_fuel_map, \
                tech_fuel_maps or no_fuel_technologies"
            )
        );
    }

    #[rstest]
    fn label_fuel_ccs_has_base_fuel(case_settings: CaseSettings) {
        let fuel = label_fuel(&"CA_S".into(), "Coal with CCS", &case_settings).unwrap();
        let fuel = fuel.combustion().unwrap();
        assert_eq!(fuel.base_fuel(), &FuelID::new("coal"));
        assert_eq!(fuel.ccs.as_ref().unwrap().capture_percent, 90);
    }

    #[rstest]
    fn resolve_generators_explicit_fuel(case_settings: CaseSettings) {
        let resources = resolve_generators_from_iter(
            iter::once(raw(
                "CA_N",
                "natural_gas_fired_combined_cycle",
                "Unknown technology",
                Some("pacific_high_resource_naturalgas"),
            )),
            &case_settings,
        )
        .unwrap();
        assert_eq!(
            resources[0].fuel.to_string(),
            "pacific_high_resource_naturalgas"
        );
    }

    #[rstest]
    #[case(raw("", "battery", "Batteries", None))]
    #[case(raw("CA_N", "", "Batteries", None))]
    #[case(raw("CA_N", "gas", "Natural Gas", Some("pacific_reference_unobtainium")))]
    #[case(raw("ERCOT", "nuclear", "Nuclear", None))]
    #[case(raw("CA_N", "gas_steam", "Natural Gas Steam Turbine", None))]
    fn resolve_generators_invalid(case_settings: CaseSettings, #[case] generator: GeneratorRaw) {
        assert!(resolve_generators_from_iter(iter::once(generator), &case_settings).is_err());
    }

    #[rstest]
    fn resolve_generators_duplicate(case_settings: CaseSettings) {
        let generators = [
            raw("CA_N", "battery", "Batteries", None),
            raw("CA_N", "battery", "Batteries", None),
        ];
        assert_error!(
            resolve_generators_from_iter(generators.into_iter(), &case_settings),
            "Resource battery is defined more than once for region CA_N"
        );
    }

    #[rstest]
    fn resolve_generators_from_file(case_settings: CaseSettings) {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(GENERATORS_FILE_NAME),
            "region,Resource,technology\n\
             CA_N,natural_gas_fired_combined_cycle,Natural Gas Fired Combined Cycle\n\
             CA_N,battery,Batteries\n",
        )
        .unwrap();

        let resources = resolve_generators(&DataSource::new(dir.path()), &case_settings).unwrap();
        assert_eq!(
            resources,
            [
                Resource {
                    region: "CA_N".into(),
                    name: "natural_gas_fired_combined_cycle".into(),
                    technology: "Natural Gas Fired Combined Cycle".into(),
                    fuel: FuelKey::Combustion(
                        CombustionFuel::new("pacific".into(), "reference".into(), "naturalgas".into())
                            .unwrap()
                    ),
                },
                Resource {
                    region: "CA_N".into(),
                    name: "battery".into(),
                    technology: "Batteries".into(),
                    fuel: FuelKey::NoFuel,
                },
            ]
        );
    }
}
