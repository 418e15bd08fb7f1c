use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::source::Source;

/// A named search page to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub label: String,
    pub url: String,
    pub source: Source,
}

#[derive(Deserialize)]
struct TargetEntry {
    label: String,
    url: String,
    source: Option<Source>,
}

const DEFAULT_TARGETS: &[(&str, Source, &str)] = &[
    (
        "Peugeot Rifter otomoto",
        Source::Otomoto,
        "https://www.otomoto.pl/osobowe/peugeot/rifter?search%5Bfilter_enum_damaged%5D=0&search%5Bfilter_enum_fuel_type%5D=diesel&search%5Bfilter_enum_gearbox%5D=automatic&search%5Bfilter_enum_has_vin%5D=1&search%5Bfilter_enum_no_accident%5D=1&search%5Border%5D=filter_float_price%3Aasc&search%5Badvanced_search_expanded%5D=true",
    ),
    (
        "Citroen Berlingo otomoto",
        Source::Otomoto,
        "https://www.otomoto.pl/osobowe/citroen/berlingo?search%5Bfilter_enum_damaged%5D=0&search%5Bfilter_enum_fuel_type%5D=diesel&search%5Bfilter_enum_gearbox%5D=automatic&search%5Bfilter_enum_generation%5D=gen-iii-2018-berlingo&search%5Bfilter_enum_has_vin%5D=1&search%5Bfilter_enum_no_accident%5D=1&search%5Border%5D=filter_float_price%3Aasc&search%5Badvanced_search_expanded%5D=true",
    ),
    (
        "Toyota Proace City otomoto",
        Source::Otomoto,
        "https://www.otomoto.pl/osobowe/toyota/proace-city-verso?search%5Bfilter_enum_damaged%5D=0&search%5Bfilter_enum_fuel_type%5D=diesel&search%5Bfilter_enum_gearbox%5D=automatic&search%5Bfilter_enum_has_vin%5D=1&search%5Bfilter_enum_no_accident%5D=1&search%5Border%5D=filter_float_price%3Aasc&search%5Badvanced_search_expanded%5D=true",
    ),
    (
        "Peugeot Rifter olx",
        Source::Olx,
        "https://www.olx.pl/motoryzacja/samochody/peugeot/?search%5Bphotos%5D=1&search%5Border%5D=filter_float_price:asc&search%5Bfilter_enum_model%5D%5B0%5D=rifter&search%5Bfilter_enum_petrol%5D%5B0%5D=diesel&search%5Bfilter_enum_condition%5D%5B0%5D=notdamaged&search%5Bfilter_enum_transmission%5D%5B0%5D=automatic",
    ),
    (
        "Citroen Berlingo olx",
        Source::Olx,
        "https://www.olx.pl/motoryzacja/samochody/citroen/?search%5Border%5D=filter_float_price:asc&search%5Bfilter_enum_model%5D%5B0%5D=berlingo&search%5Bfilter_float_year:from%5D=2018&search%5Bfilter_enum_petrol%5D%5B0%5D=diesel&search%5Bfilter_enum_condition%5D%5B0%5D=notdamaged&search%5Bfilter_enum_transmission%5D%5B0%5D=automatic",
    ),
    (
        "Toyota Proace City olx",
        Source::Olx,
        "https://www.olx.pl/motoryzacja/samochody/toyota/?search%5Border%5D=filter_float_price:asc&search%5Bfilter_enum_model%5D%5B0%5D=proace-city-verso&search%5Bfilter_enum_petrol%5D%5B0%5D=diesel&search%5Bfilter_enum_condition%5D%5B0%5D=notdamaged&search%5Bfilter_enum_transmission%5D%5B0%5D=automatic",
    ),
];

pub fn defaults() -> Vec<Target> {
    DEFAULT_TARGETS
        .iter()
        .map(|&(label, source, url)| Target {
            label: label.to_string(),
            url: url.to_string(),
            source,
        })
        .collect()
}

/// Built-in targets, or the JSON list at `path` when given.
pub fn load(path: Option<&Path>) -> Result<Vec<Target>> {
    match path {
        None => Ok(defaults()),
        Some(p) => {
            let json = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read targets file {}", p.display()))?;
            parse(&json).with_context(|| format!("Invalid targets file {}", p.display()))
        }
    }
}

pub fn parse(json: &str) -> Result<Vec<Target>> {
    let entries: Vec<TargetEntry> = serde_json::from_str(json)?;
    entries
        .into_iter()
        .map(|e| {
            let source = match e.source.or_else(|| Source::from_url(&e.url)) {
                Some(s) => s,
                None => bail!("Cannot tell the source of {:?}; set \"source\"", e.label),
            };
            Ok(Target {
                label: e.label,
                url: e.url,
                source,
            })
        })
        .collect()
}

/// Keep targets whose label contains any of `filters` (case-insensitive).
pub fn select(targets: Vec<Target>, filters: &[String]) -> Vec<Target> {
    if filters.is_empty() {
        return targets;
    }
    let filters: Vec<String> = filters.iter().map(|f| f.to_lowercase()).collect();
    targets
        .into_iter()
        .filter(|t| {
            let label = t.label.to_lowercase();
            filters.iter().any(|f| label.contains(f))
        })
        .collect()
}
