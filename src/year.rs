//! Code for selecting model periods from a string given on the command line.
use crate::input::is_sorted_and_unique;
use anyhow::{Context, Result, ensure};
use itertools::Itertools;

/// Parse a single period and check that it is one of `valid_years`
fn parse_period(s: &str, valid_years: &[u32]) -> Result<u32> {
    let s = s.trim();
    s.parse::<u32>()
        .ok()
        .filter(|year| valid_years.binary_search(year).is_ok())
        .with_context(|| format!("Invalid year: {s}"))
}

/// Parse a string describing which periods to run.
///
/// The string may be `all` (case-insensitive), a single year, a list of years separated by
/// semicolons (e.g. `2030;2040`) or a range (e.g. `2030..2040`, `2035..` or `..2040`).
///
/// # Arguments
///
/// * `s` - Input string to parse
/// * `valid_years` - The periods defined for the case (must be sorted and unique)
///
/// # Returns
///
/// The selected periods, in ascending order, or an error.
///
/// # Panics
///
/// If `valid_years` is unsorted or non-unique.
pub fn parse_year_str(s: &str, valid_years: &[u32]) -> Result<Vec<u32>> {
    assert!(
        is_sorted_and_unique(valid_years),
        "`valid_years` must be sorted and unique"
    );

    let s = s.trim();
    ensure!(!s.is_empty(), "No years provided");

    if s.eq_ignore_ascii_case("all") {
        return Ok(valid_years.to_vec());
    }

    if let Some((start, end)) = s.split_once("..") {
        ensure!(
            !s.contains(';'),
            "Year string {s} mixes a range with a list of years"
        );
        return parse_year_range(start.trim(), end.trim(), valid_years);
    }

    let years: Vec<_> = s
        .split(';')
        .map(|year| parse_period(year, valid_years))
        .try_collect()?;
    ensure!(
        is_sorted_and_unique(&years),
        "Years must be in order and unique"
    );

    Ok(years)
}

/// Select the periods within a range, where an empty limit means the first or last period
fn parse_year_range(start: &str, end: &str, valid_years: &[u32]) -> Result<Vec<u32>> {
    let parse_limit = |limit: &str, default: Option<&u32>| -> Result<u32> {
        if limit.is_empty() {
            default.copied().context("No years defined")
        } else {
            limit
                .parse()
                .ok()
                .with_context(|| format!("Invalid limit in year range: {limit}"))
        }
    };
    let start = parse_limit(start, valid_years.first())?;
    let end = parse_limit(end, valid_years.last())?;
    ensure!(
        start <= end,
        "Start of year range ({start}) must not be after its end ({end})"
    );

    let years = valid_years
        .iter()
        .copied()
        .filter(|year| (start..=end).contains(year))
        .collect_vec();
    ensure!(!years.is_empty(), "No years found between {start} and {end}");

    Ok(years)
}
