use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One row of the country catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountrySummary {
    pub name: String,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub flag: String,
}

impl CountrySummary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capital: Vec::new(),
            population: 0,
            region: String::new(),
            flag: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeName {
    pub language: String,
    #[serde(default)]
    pub official: String,
    #[serde(default)]
    pub common: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub code: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flags {
    #[serde(default)]
    pub png: String,
    #[serde(default)]
    pub svg: String,
    #[serde(default)]
    pub alt: String,
}

/// Full record shown in the detail view. Optional upstream fields are
/// already flattened to empty sequences by the time one of these exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryDetail {
    #[serde(flatten)]
    pub summary: CountrySummary,
    #[serde(default)]
    pub official_name: String,
    #[serde(default)]
    pub native_names: Vec<NativeName>,
    #[serde(default)]
    pub currencies: Vec<Currency>,
    #[serde(default)]
    pub borders: Vec<String>,
    #[serde(default)]
    pub languages: Vec<Language>,
    #[serde(default)]
    pub flags: Flags,
}

impl CountryDetail {
    pub fn name(&self) -> &str {
        &self.summary.name
    }
}

/// Field a search term is matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchCriterion {
    #[default]
    Name,
    Region,
    #[serde(rename = "lang")]
    Language,
    Currency,
}

impl SearchCriterion {
    pub const ALL: [SearchCriterion; 4] = [
        SearchCriterion::Name,
        SearchCriterion::Region,
        SearchCriterion::Language,
        SearchCriterion::Currency,
    ];

    /// Value persisted in the preference store and used as the REST path segment.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchCriterion::Name => "name",
            SearchCriterion::Region => "region",
            SearchCriterion::Language => "lang",
            SearchCriterion::Currency => "currency",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SearchCriterion::Name => "Country Name",
            SearchCriterion::Region => "Region",
            SearchCriterion::Language => "Language",
            SearchCriterion::Currency => "Currency",
        }
    }
}

impl fmt::Display for SearchCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchCriterion {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        SearchCriterion::ALL
            .into_iter()
            .find(|criterion| criterion.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown search criterion: {value}"))
    }
}
