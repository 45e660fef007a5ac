use crate::error::SourceResult;
use crate::types::{CountrySummary, SearchCriterion};

use super::token::{GenerationTracker, QueryToken};

/// What to do for a committed search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryPlan {
    /// Empty term: show the unfiltered catalogue without a request.
    ShowAll { token: QueryToken },
    Fetch {
        token: QueryToken,
        criterion: SearchCriterion,
        term: String,
    },
}

impl QueryPlan {
    pub fn token(&self) -> QueryToken {
        match self {
            QueryPlan::ShowAll { token } | QueryPlan::Fetch { token, .. } => *token,
        }
    }
}

#[derive(Debug)]
pub enum QueryResolution {
    /// A newer search was issued after this one; nothing changes.
    Stale,
    Results(Vec<CountrySummary>),
    /// The current search failed; the active set is to be cleared.
    Failed,
}

/// Issues searches and decides which resolutions may touch the store.
///
/// Every plan mints a token, including an empty-term reset, so a reset
/// also invalidates whatever search is still in flight.
#[derive(Debug, Default)]
pub struct QueryCoordinator {
    criterion: SearchCriterion,
    tokens: GenerationTracker,
    in_flight: Option<QueryToken>,
}

impl QueryCoordinator {
    pub fn new(criterion: SearchCriterion) -> Self {
        Self {
            criterion,
            tokens: GenerationTracker::new(),
            in_flight: None,
        }
    }

    pub fn criterion(&self) -> SearchCriterion {
        self.criterion
    }

    /// Returns `true` if the criterion changed.
    pub fn set_criterion(&mut self, criterion: SearchCriterion) -> bool {
        if self.criterion == criterion {
            return false;
        }
        self.criterion = criterion;
        true
    }

    pub fn in_flight(&self) -> Option<QueryToken> {
        self.in_flight
    }

    pub fn plan(&mut self, term: &str) -> QueryPlan {
        let token = QueryToken::mint(&mut self.tokens);
        let term = term.trim();
        if term.is_empty() {
            self.in_flight = None;
            return QueryPlan::ShowAll { token };
        }
        self.in_flight = Some(token);
        QueryPlan::Fetch {
            token,
            criterion: self.criterion,
            term: term.to_string(),
        }
    }

    pub fn resolve(
        &mut self,
        token: QueryToken,
        outcome: SourceResult<Vec<CountrySummary>>,
    ) -> QueryResolution {
        if !token.is_current(&self.tokens) {
            tracing::trace!("discarding stale search result {token}");
            return QueryResolution::Stale;
        }
        self.in_flight = None;
        match outcome {
            Ok(countries) => QueryResolution::Results(countries),
            Err(error) => {
                tracing::warn!("search {token} failed: {error}");
                QueryResolution::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::source::scripted::countries;

    #[test]
    fn empty_term_shows_all_without_request() {
        let mut coordinator = QueryCoordinator::new(SearchCriterion::Name);
        assert!(matches!(coordinator.plan("   "), QueryPlan::ShowAll { .. }));
        assert!(coordinator.in_flight().is_none());
    }

    #[test]
    fn fetch_carries_criterion_and_trimmed_term() {
        let mut coordinator = QueryCoordinator::new(SearchCriterion::Currency);
        match coordinator.plan(" eur ") {
            QueryPlan::Fetch {
                criterion, term, ..
            } => {
                assert_eq!(criterion, SearchCriterion::Currency);
                assert_eq!(term, "eur");
            }
            other => panic!("expected fetch, got {other:?}"),
        }
    }

    #[test]
    fn later_query_wins_regardless_of_arrival_order() {
        let mut coordinator = QueryCoordinator::new(SearchCriterion::Name);
        let a = coordinator.plan("ger").token();
        let b = coordinator.plan("germany").token();

        match coordinator.resolve(b, Ok(countries("b", 1))) {
            QueryResolution::Results(rows) => assert_eq!(rows[0].name, "b-0"),
            other => panic!("expected results, got {other:?}"),
        }
        assert!(matches!(
            coordinator.resolve(a, Ok(countries("a", 5))),
            QueryResolution::Stale
        ));
    }

    #[test]
    fn stale_failure_is_silent() {
        let mut coordinator = QueryCoordinator::new(SearchCriterion::Name);
        let a = coordinator.plan("fra").token();
        let b = coordinator.plan("").token();
        assert!(b > a);
        let outcome = Err(SourceError::Status {
            status: 500,
            url: "http://test".to_string(),
        });
        assert!(matches!(coordinator.resolve(a, outcome), QueryResolution::Stale));
    }

    #[test]
    fn current_failure_clears() {
        let mut coordinator = QueryCoordinator::new(SearchCriterion::Region);
        let token = coordinator.plan("atlantis").token();
        let outcome = Err(SourceError::Status {
            status: 404,
            url: "http://test".to_string(),
        });
        assert!(matches!(coordinator.resolve(token, outcome), QueryResolution::Failed));
        assert!(coordinator.in_flight().is_none());
    }

    #[test]
    fn set_criterion_reports_change() {
        let mut coordinator = QueryCoordinator::default();
        assert!(!coordinator.set_criterion(SearchCriterion::Name));
        assert!(coordinator.set_criterion(SearchCriterion::Language));
        assert_eq!(coordinator.criterion(), SearchCriterion::Language);
    }
}
