use tokio::sync::mpsc;

use super::debounce::SearchDebouncer;
use super::loader::IncrementalLoader;
use super::protocol::DirectoryEvent;
use super::query::{QueryCoordinator, QueryPlan, QueryResolution};
use super::results::{ActiveSource, ResultStore};
use super::selection::{
    DetailResolution, SelectionController, SelectionState, SelectionStatus, UiState,
};
use super::token::{DetailToken, ObserverId, QueryToken};
use super::view::{results_label, DirectoryView};
use crate::bus::Bus;
use crate::config::DirectoryConfig;
use crate::event::DirectoryUpdate;
use crate::source::DirectorySources;
use crate::storage::{parse_search_by, SharedPreferences, SEARCH_BY_KEY, SEARCH_TERM_KEY};
use crate::types::{CountrySummary, SearchCriterion};

/// Owns all controller state and applies events one at a time.
///
/// Fetches and debounce timers run on their own tasks and report back
/// through the inbox. The actor keeps only a weak sender for them, so it
/// stops once every [`DirectoryHandle`](super::DirectoryHandle) is gone.
pub(crate) struct DirectoryActor {
    sources: DirectorySources,
    preferences: SharedPreferences,
    bus: Bus,
    event_tx: mpsc::WeakUnboundedSender<DirectoryEvent>,
    event_rx: mpsc::UnboundedReceiver<DirectoryEvent>,
    search_term: String,
    catalogue_loaded: bool,
    results: ResultStore,
    debouncer: SearchDebouncer,
    queries: QueryCoordinator,
    loader: IncrementalLoader,
    selection: SelectionController,
}

impl DirectoryActor {
    pub(crate) fn new(
        config: &DirectoryConfig,
        sources: DirectorySources,
        preferences: SharedPreferences,
        bus: Bus,
        event_tx: mpsc::WeakUnboundedSender<DirectoryEvent>,
        event_rx: mpsc::UnboundedReceiver<DirectoryEvent>,
    ) -> Self {
        let search_term = preferences.get(SEARCH_TERM_KEY).unwrap_or_default();
        let criterion = match preferences.get(SEARCH_BY_KEY) {
            Some(raw) => parse_search_by(&raw).unwrap_or_else(|| {
                tracing::warn!("ignoring unknown stored search criterion {raw:?}");
                SearchCriterion::default()
            }),
            None => SearchCriterion::default(),
        };

        Self {
            sources,
            preferences,
            bus,
            event_tx,
            event_rx,
            search_term,
            catalogue_loaded: false,
            results: ResultStore::new(),
            debouncer: SearchDebouncer::new(config.debounce()),
            queries: QueryCoordinator::new(criterion),
            loader: IncrementalLoader::new(config.initial_window, config.window_step),
            selection: SelectionController::new(),
        }
    }

    pub(crate) async fn run(mut self) {
        self.mount();

        while let Some(event) = self.event_rx.recv().await {
            match event {
                DirectoryEvent::Shutdown { reply } => {
                    self.teardown();
                    let _ = reply.send(());
                    return;
                }
                DirectoryEvent::Snapshot { reply } => {
                    let _ = reply.send(self.snapshot());
                }
                DirectoryEvent::Input { text } => self.handle_input(text),
                DirectoryEvent::SetCriterion { criterion } => self.handle_criterion(criterion),
                DirectoryEvent::SentinelVisible { observer } => self.handle_sentinel(observer),
                DirectoryEvent::Select { name } => self.handle_select(name),
                DirectoryEvent::Close => self.handle_close(),
                DirectoryEvent::TermCommitted { generation, term } => {
                    self.handle_commit(generation, term)
                }
                DirectoryEvent::CatalogueLoaded { outcome } => {
                    let countries = outcome.unwrap_or_else(|error| {
                        tracing::warn!("failed to load country catalogue: {error}");
                        Vec::new()
                    });
                    self.handle_catalogue(countries);
                }
                DirectoryEvent::SearchResolved { token, outcome } => {
                    let resolution = self.queries.resolve(token, outcome);
                    self.handle_search_resolved(token, resolution);
                }
                DirectoryEvent::DetailResolved { token, outcome } => {
                    let before = self.selection.ui();
                    match self.selection.resolve(token, outcome) {
                        DetailResolution::Stale => {}
                        DetailResolution::Opened | DetailResolution::Reverted => {
                            self.publish_selection(before)
                        }
                    }
                }
            }
        }

        self.teardown();
    }

    fn mount(&mut self) {
        tracing::info!(
            "mounting country directory criterion={} restored_term={:?}",
            self.queries.criterion(),
            self.search_term
        );
        self.rebind_observer();
        self.spawn_catalogue();
        if !self.search_term.is_empty() {
            let term = self.search_term.clone();
            self.schedule_commit(term);
        }
    }

    fn teardown(&mut self) {
        self.debouncer.teardown();
        if let Some(observer) = self.loader.disconnect() {
            tracing::debug!("directory stopped; disconnected {observer}");
        }
    }

    fn handle_input(&mut self, text: String) {
        self.preferences.set(SEARCH_TERM_KEY, &text);
        self.search_term = text.clone();
        self.schedule_commit(text);
    }

    fn schedule_commit(&mut self, term: String) {
        let tx = self.event_tx.clone();
        self.debouncer.input(term, move |generation, term| {
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(DirectoryEvent::TermCommitted { generation, term });
            }
        });
    }

    fn handle_commit(&mut self, generation: u64, term: String) {
        if let Some(term) = self.debouncer.commit(generation, term) {
            self.issue(&term);
        }
    }

    fn handle_criterion(&mut self, criterion: SearchCriterion) {
        if !self.queries.set_criterion(criterion) {
            return;
        }
        self.preferences.set(SEARCH_BY_KEY, criterion.as_str());
        let term = self.debouncer.committed().to_string();
        self.issue(&term);
    }

    fn issue(&mut self, term: &str) {
        match self.queries.plan(term) {
            QueryPlan::ShowAll { token } => {
                tracing::debug!("search {token} cleared; showing full catalogue");
                self.results.show_all(self.loader.window());
                self.after_active_change();
            }
            QueryPlan::Fetch {
                token,
                criterion,
                term,
            } => {
                tracing::debug!("issuing search {token} {criterion}={term:?}");
                self.publish(DirectoryUpdate::SearchIssued {
                    token,
                    criterion,
                    term: term.clone(),
                });
                self.spawn_search(token, criterion, term);
            }
        }
    }

    fn handle_search_resolved(&mut self, token: QueryToken, resolution: QueryResolution) {
        match resolution {
            QueryResolution::Stale => {}
            QueryResolution::Results(countries) => {
                tracing::debug!("search {token} resolved with {} countries", countries.len());
                self.results.replace_active(countries, self.loader.window());
                self.after_active_change();
            }
            QueryResolution::Failed => {
                self.results.clear_active();
                self.after_active_change();
            }
        }
    }

    fn handle_catalogue(&mut self, countries: Vec<CountrySummary>) {
        tracing::info!("country catalogue loaded with {} entries", countries.len());
        self.catalogue_loaded = true;
        if self.results.load_all(countries, self.loader.window()) {
            self.after_active_change();
        } else {
            self.publish_results();
        }
    }

    fn handle_sentinel(&mut self, observer: ObserverId) {
        // The sentinel is not rendered while there is nothing to show.
        if self.results.displayed_len() == 0 {
            return;
        }
        if let Some(window) = self.loader.on_sentinel_visible(observer) {
            let revealed = self.results.extend_to(window);
            tracing::trace!("window grew to {window}, revealed {revealed} rows");
            self.publish_results();
        }
    }

    fn handle_select(&mut self, name: String) {
        let before = self.selection.ui();
        let token = self.selection.select(&name);
        self.publish_selection(before);
        self.spawn_detail(token, name);
    }

    fn handle_close(&mut self) {
        let before = self.selection.ui();
        if self.selection.close() {
            self.publish_selection(before);
        }
    }

    fn after_active_change(&mut self) {
        self.rebind_observer();
        self.publish_results();
    }

    fn rebind_observer(&mut self) {
        if let Some(rebound) = self.loader.rebind(self.results.active_id()) {
            self.publish(DirectoryUpdate::ObserverRebound {
                previous: rebound.previous,
                current: rebound.current,
            });
        }
    }

    fn no_results(&self) -> bool {
        self.results.displayed_len() == 0
            && (self.catalogue_loaded || self.results.source() == ActiveSource::Filtered)
    }

    fn publish_results(&self) {
        self.publish(DirectoryUpdate::ResultsChanged {
            displayed: self.results.displayed_len(),
            active: self.results.active_len(),
            total: self.results.total_len(),
            window: self.loader.window(),
            no_results: self.no_results(),
        });
    }

    fn publish_selection(&self, before: UiState) {
        self.publish(DirectoryUpdate::SelectionChanged {
            selection: SelectionStatus::from(self.selection.state()),
        });
        let after = self.selection.ui();
        if after.scroll_locked != before.scroll_locked {
            self.publish(DirectoryUpdate::ScrollLockChanged {
                locked: after.scroll_locked,
            });
        }
    }

    fn publish(&self, update: DirectoryUpdate) {
        // No subscribers is fine; the snapshot is always available.
        let _ = self.bus.publish(update);
    }

    fn snapshot(&self) -> DirectoryView {
        let detail = match self.selection.state() {
            SelectionState::Open { detail } => Some(detail.as_ref().clone()),
            _ => None,
        };
        DirectoryView {
            countries: self.results.displayed().to_vec(),
            active_count: self.results.active_len(),
            total_count: self.results.total_len(),
            window: self.loader.window(),
            observer: self.loader.observer().map(|observer| observer.id),
            search_term: self.search_term.clone(),
            committed_term: self.debouncer.committed().to_string(),
            criterion: self.queries.criterion(),
            searching: self.queries.in_flight().is_some(),
            catalogue_loaded: self.catalogue_loaded,
            selection: SelectionStatus::from(self.selection.state()),
            detail,
            ui: self.selection.ui(),
            no_results: self.no_results(),
            results_label: results_label(
                &self.search_term,
                self.results.displayed_len(),
                self.results.active_len(),
            ),
        }
    }

    fn spawn_catalogue(&self) {
        let source = self.sources.list.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = source.list_countries().await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(DirectoryEvent::CatalogueLoaded { outcome });
            }
        });
    }

    fn spawn_search(&self, token: QueryToken, criterion: SearchCriterion, term: String) {
        let source = self.sources.filter.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = source.filter_countries(criterion, &term).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(DirectoryEvent::SearchResolved { token, outcome });
            }
        });
    }

    fn spawn_detail(&self, token: DetailToken, name: String) {
        let source = self.sources.detail.clone();
        let tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = source.country_detail(&name).await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(DirectoryEvent::DetailResolved { token, outcome });
            }
        });
    }
}
