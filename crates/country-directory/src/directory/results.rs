use std::sync::Arc;

use crate::types::CountrySummary;

/// Where the active set came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSource {
    /// The unfiltered catalogue.
    All,
    /// The latest search that resolved (possibly empty after a failure).
    Filtered,
}

/// Full catalogue plus the active set and how much of it is shown.
///
/// The displayed rows are stored as a length into the active set, so they
/// are a prefix of it by construction. Every replacement of the active set
/// gets a new identity, which the loader uses to re-bind its observer.
#[derive(Debug)]
pub struct ResultStore {
    all: Arc<Vec<CountrySummary>>,
    active: Arc<Vec<CountrySummary>>,
    source: ActiveSource,
    active_id: u64,
    displayed: usize,
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultStore {
    pub fn new() -> Self {
        Self {
            all: Arc::new(Vec::new()),
            active: Arc::new(Vec::new()),
            source: ActiveSource::All,
            active_id: 0,
            displayed: 0,
        }
    }

    /// Stores the catalogue fetched on mount. The display only follows it
    /// while no search result is active.
    pub fn load_all(&mut self, countries: Vec<CountrySummary>, window: usize) -> bool {
        self.all = Arc::new(countries);
        if self.source == ActiveSource::All {
            self.show_all(window);
            true
        } else {
            false
        }
    }

    pub fn show_all(&mut self, window: usize) {
        let all = self.all.clone();
        self.set_active(all, ActiveSource::All, window);
    }

    pub fn replace_active(&mut self, countries: Vec<CountrySummary>, window: usize) {
        self.set_active(Arc::new(countries), ActiveSource::Filtered, window);
    }

    pub fn clear_active(&mut self) {
        self.set_active(Arc::new(Vec::new()), ActiveSource::Filtered, 0);
    }

    fn set_active(&mut self, active: Arc<Vec<CountrySummary>>, source: ActiveSource, window: usize) {
        self.active = active;
        self.source = source;
        self.active_id += 1;
        self.displayed = window.min(self.active.len());
    }

    /// Shows up to `window` rows of the active set. Returns how many rows
    /// were revealed; the display never shrinks here.
    pub fn extend_to(&mut self, window: usize) -> usize {
        let target = window.min(self.active.len());
        if target <= self.displayed {
            return 0;
        }
        let revealed = target - self.displayed;
        self.displayed = target;
        revealed
    }

    pub fn displayed(&self) -> &[CountrySummary] {
        &self.active[..self.displayed]
    }

    pub fn displayed_len(&self) -> usize {
        self.displayed
    }

    pub fn active(&self) -> &Arc<Vec<CountrySummary>> {
        &self.active
    }

    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn total_len(&self) -> usize {
        self.all.len()
    }

    pub fn active_id(&self) -> u64 {
        self.active_id
    }

    pub fn source(&self) -> ActiveSource {
        self.source
    }

    pub fn is_exhausted(&self) -> bool {
        self.displayed >= self.active.len()
    }
}
