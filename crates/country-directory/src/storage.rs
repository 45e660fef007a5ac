//! Preference persistence for the search bar.

pub mod file;
pub mod kv_store;

use std::sync::Arc;

pub use file::FilePreferenceStore;
pub use kv_store::{MemoryPreferenceStore, PreferenceStore};

pub const SEARCH_TERM_KEY: &str = "searchTerm";
pub const SEARCH_BY_KEY: &str = "searchBy";

pub type SharedPreferences = Arc<dyn PreferenceStore>;

/// Reads a stored `searchBy` value.
///
/// Older front-ends stored the whole select option (`{"value": "region",
/// "label": "Region"}`); newer ones store the bare value.
pub fn parse_search_by(raw: &str) -> Option<crate::types::SearchCriterion> {
    let raw = raw.trim();
    if raw.starts_with('{') {
        let option: serde_json::Value = serde_json::from_str(raw).ok()?;
        return option.get("value")?.as_str()?.parse().ok();
    }
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SearchCriterion;

    #[test]
    fn parses_bare_and_option_values() {
        assert_eq!(parse_search_by("region"), Some(SearchCriterion::Region));
        assert_eq!(
            parse_search_by(r#"{"value":"lang","label":"Language"}"#),
            Some(SearchCriterion::Language)
        );
        assert_eq!(parse_search_by(r#"{"label":"Language"}"#), None);
        assert_eq!(parse_search_by("capital"), None);
    }
}
