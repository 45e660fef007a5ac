use serde::Serialize;

use super::selection::{SelectionStatus, UiState};
use super::token::ObserverId;
use crate::types::{CountryDetail, CountrySummary, SearchCriterion};

/// Point-in-time copy of everything the presentation layer renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryView {
    pub countries: Vec<CountrySummary>,
    pub active_count: usize,
    pub total_count: usize,
    pub window: usize,
    pub observer: Option<ObserverId>,
    pub search_term: String,
    pub committed_term: String,
    pub criterion: SearchCriterion,
    pub searching: bool,
    pub catalogue_loaded: bool,
    pub selection: SelectionStatus,
    pub detail: Option<CountryDetail>,
    pub ui: UiState,
    pub no_results: bool,
    pub results_label: Option<String>,
}

impl DirectoryView {
    pub fn displayed_names(&self) -> Vec<&str> {
        self.countries
            .iter()
            .map(|country| country.name.as_str())
            .collect()
    }
}

pub(crate) fn results_label(search_term: &str, displayed: usize, active: usize) -> Option<String> {
    if search_term.is_empty() || displayed == 0 {
        return None;
    }
    Some(format!("Showing {displayed} out of {active} results"))
}
