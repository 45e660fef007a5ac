//! Preference store trait and in-memory implementation.

use std::collections::HashMap;

use parking_lot::RwLock;

/// String key-value store for UI preferences.
///
/// `set` is fire-and-forget: implementations log persistence failures
/// instead of reporting them.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

// --- Memory Implementation ---

#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let data = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            data: RwLock::new(data),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.data.read().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.data.write().insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_missing_returns_none() {
        let store = MemoryPreferenceStore::new();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn set_overwrites_previous_value() {
        let store = MemoryPreferenceStore::with_entries([("searchTerm", "ger")]);
        assert_eq!(store.get("searchTerm").as_deref(), Some("ger"));
        store.set("searchTerm", "germany");
        assert_eq!(store.get("searchTerm").as_deref(), Some("germany"));
    }
}
