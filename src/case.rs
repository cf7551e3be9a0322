//! A case is a directory of input files describing one study.
//!
//! Each case may define several scenarios (identified by a case ID) and periods (model years), each
//! with its own settings.
use crate::id::define_id_type;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use itertools::Itertools;

pub mod settings;
pub use settings::{CASE_SETTINGS_FILE_NAME, CaseSettings};

define_id_type! {CaseID}

/// Settings for each scenario and period in a case, keyed by case ID and model year
#[derive(Debug, Default, PartialEq)]
pub struct ScenarioSettingsMap(IndexMap<(CaseID, u32), CaseSettings>);

impl ScenarioSettingsMap {
    /// Create a new map from its entries
    pub fn new(map: IndexMap<(CaseID, u32), CaseSettings>) -> Self {
        Self(map)
    }

    /// Get the settings for the given case ID and model year
    pub fn get(&self, case_id: &CaseID, year: u32) -> Result<&CaseSettings> {
        self.0
            .get(&(case_id.clone(), year))
            .with_context(|| format!("No scenario defined for case {case_id} in year {year}"))
    }

    /// Iterate over the distinct case IDs, in the order they were defined
    pub fn iter_case_ids(&self) -> impl Iterator<Item = &CaseID> {
        self.0.keys().map(|(case_id, _)| case_id).unique()
    }

    /// Get the model years defined for a case, in ascending order
    pub fn years_for_case(&self, case_id: &CaseID) -> Vec<u32> {
        self.0
            .keys()
            .filter(|(id, _)| id == case_id)
            .map(|(_, year)| *year)
            .sorted()
            .collect()
    }

    /// Iterate over all the settings
    pub fn iter(&self) -> impl Iterator<Item = (&CaseID, u32, &CaseSettings)> {
        self.0
            .iter()
            .map(|((case_id, year), settings)| (case_id, *year, settings))
    }

    /// The number of scenario/period combinations
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no scenarios
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
