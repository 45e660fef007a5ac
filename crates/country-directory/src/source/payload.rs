//! Decoding of upstream country payloads.
//!
//! The REST API and the GraphQL gateway describe a country with the same
//! outer shape but differ in how nested collections are encoded: REST uses
//! keyed objects (`{"EUR": {...}}`) while the gateway has already flattened
//! them into lists. Both decode into the same wire structs here; keyed
//! objects keep the upstream key order.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{SourceError, SourceResult};
use crate::types::{CountryDetail, CountrySummary, Currency, Flags, Language, NativeName};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireName {
    Plain(String),
    Full {
        common: Option<String>,
        official: Option<String>,
        #[serde(rename = "nativeName")]
        native_name: Option<WireNativeNames>,
    },
}

#[derive(Debug, Deserialize)]
struct WireNameValue {
    official: Option<String>,
    common: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireNativeNames {
    List(Vec<WireNativeEntry>),
    Keyed(IndexMap<String, WireNameValue>),
}

#[derive(Debug, Deserialize)]
struct WireNativeEntry {
    language: Option<String>,
    official: Option<String>,
    common: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCurrencyValue {
    name: Option<String>,
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCurrencyEntry {
    code: Option<String>,
    name: Option<String>,
    symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireCurrencies {
    List(Vec<WireCurrencyEntry>),
    Keyed(IndexMap<String, WireCurrencyValue>),
}

#[derive(Debug, Deserialize)]
struct WireLanguageEntry {
    key: Option<String>,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireLanguages {
    List(Vec<WireLanguageEntry>),
    Keyed(IndexMap<String, String>),
}

#[derive(Debug, Deserialize)]
struct WireFlags {
    png: Option<String>,
    svg: Option<String>,
    alt: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireCountry {
    name: Option<WireName>,
    capital: Option<Vec<String>>,
    population: Option<u64>,
    region: Option<String>,
    flag: Option<String>,
    currencies: Option<WireCurrencies>,
    borders: Option<Vec<String>>,
    flags: Option<WireFlags>,
    languages: Option<WireLanguages>,
}

impl WireCountry {
    fn common_name(&self) -> Option<&str> {
        let name = match self.name.as_ref()? {
            WireName::Plain(name) => name.as_str(),
            WireName::Full { common, .. } => common.as_deref()?,
        };
        let name = name.trim();
        (!name.is_empty()).then_some(name)
    }

    fn into_summary(self) -> Option<CountrySummary> {
        let name = self.common_name()?.to_string();
        Some(CountrySummary {
            name,
            capital: self.capital.unwrap_or_default(),
            population: self.population.unwrap_or_default(),
            region: self.region.unwrap_or_default(),
            flag: self.flag.unwrap_or_default(),
        })
    }

    fn into_detail(self) -> Option<CountryDetail> {
        let name = self.common_name()?.to_string();
        let (official_name, native_names) = match self.name {
            Some(WireName::Full {
                official,
                native_name,
                ..
            }) => (
                official.unwrap_or_default(),
                native_name.map(flatten_native_names).unwrap_or_default(),
            ),
            _ => (String::new(), Vec::new()),
        };
        let flags = self
            .flags
            .map(|flags| Flags {
                png: flags.png.unwrap_or_default(),
                svg: flags.svg.unwrap_or_default(),
                alt: flags.alt.unwrap_or_default(),
            })
            .unwrap_or_default();
        // The gateway reports the SVG as the flag; fall back to the emoji.
        let flag = if flags.svg.is_empty() {
            self.flag.unwrap_or_default()
        } else {
            flags.svg.clone()
        };

        Some(CountryDetail {
            summary: CountrySummary {
                name,
                capital: self.capital.unwrap_or_default(),
                population: self.population.unwrap_or_default(),
                region: self.region.unwrap_or_default(),
                flag,
            },
            official_name,
            native_names,
            currencies: self.currencies.map(flatten_currencies).unwrap_or_default(),
            borders: self.borders.unwrap_or_default(),
            languages: self.languages.map(flatten_languages).unwrap_or_default(),
            flags,
        })
    }
}

fn flatten_native_names(names: WireNativeNames) -> Vec<NativeName> {
    match names {
        WireNativeNames::List(entries) => entries
            .into_iter()
            .map(|entry| NativeName {
                language: entry.language.unwrap_or_default(),
                official: entry.official.unwrap_or_default(),
                common: entry.common.unwrap_or_default(),
            })
            .collect(),
        WireNativeNames::Keyed(entries) => entries
            .into_iter()
            .map(|(language, value)| NativeName {
                language,
                official: value.official.unwrap_or_default(),
                common: value.common.unwrap_or_default(),
            })
            .collect(),
    }
}

fn flatten_currencies(currencies: WireCurrencies) -> Vec<Currency> {
    match currencies {
        WireCurrencies::List(entries) => entries
            .into_iter()
            .map(|entry| Currency {
                code: entry.code.unwrap_or_default(),
                name: entry.name.unwrap_or_default(),
                symbol: entry.symbol.unwrap_or_default(),
            })
            .collect(),
        WireCurrencies::Keyed(entries) => entries
            .into_iter()
            .map(|(code, value)| Currency {
                code,
                name: value.name.unwrap_or_default(),
                symbol: value.symbol.unwrap_or_default(),
            })
            .collect(),
    }
}

fn flatten_languages(languages: WireLanguages) -> Vec<Language> {
    match languages {
        WireLanguages::List(entries) => entries
            .into_iter()
            .map(|entry| Language {
                code: entry.key.unwrap_or_default(),
                name: entry.value.unwrap_or_default(),
            })
            .collect(),
        WireLanguages::Keyed(entries) => entries
            .into_iter()
            .map(|(code, name)| Language { code, name })
            .collect(),
    }
}

/// Decodes a list payload. `null` means "no countries"; entries that lack a
/// usable name are skipped.
pub fn parse_summaries(payload: Value) -> SourceResult<Vec<CountrySummary>> {
    let items = match payload {
        Value::Null => return Ok(Vec::new()),
        Value::Array(items) => items,
        other => {
            return Err(SourceError::Decode(format!(
                "expected a country list, got {}",
                value_kind(&other)
            )))
        }
    };

    let total = items.len();
    let summaries: Vec<CountrySummary> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<WireCountry>(item) {
            Ok(wire) => wire.into_summary(),
            Err(error) => {
                tracing::debug!("skipping undecodable country entry: {error}");
                None
            }
        })
        .collect();

    if summaries.len() < total {
        tracing::warn!(
            "skipped {} malformed country entries out of {}",
            total - summaries.len(),
            total
        );
    }
    Ok(summaries)
}

/// Decodes a single country record. `null` is "not found".
pub fn parse_detail(payload: Value) -> SourceResult<Option<CountryDetail>> {
    if payload.is_null() {
        return Ok(None);
    }
    let wire: WireCountry = serde_json::from_value(payload)
        .map_err(|error| SourceError::Decode(format!("invalid country record: {error}")))?;
    wire.into_detail()
        .map(Some)
        .ok_or_else(|| SourceError::Decode("country record has no name".to_string()))
}

/// Decodes the REST `name/{name}?fullText=true` response, which wraps the
/// match in an array.
pub fn parse_detail_list(payload: Value) -> SourceResult<Option<CountryDetail>> {
    match payload {
        Value::Null => Ok(None),
        Value::Array(items) => match items.into_iter().next() {
            Some(first) => parse_detail(first),
            None => Ok(None),
        },
        other => parse_detail(other),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
