use tokio::sync::oneshot;

use super::token::{DetailToken, ObserverId, QueryToken};
use super::view::DirectoryView;
use crate::error::SourceResult;
use crate::types::{CountryDetail, CountrySummary, SearchCriterion};

/// Everything the directory actor reacts to, in arrival order.
pub(crate) enum DirectoryEvent {
    Input {
        text: String,
    },
    SetCriterion {
        criterion: SearchCriterion,
    },
    SentinelVisible {
        observer: ObserverId,
    },
    Select {
        name: String,
    },
    Close,
    Snapshot {
        reply: oneshot::Sender<DirectoryView>,
    },
    Shutdown {
        reply: oneshot::Sender<()>,
    },
    TermCommitted {
        generation: u64,
        term: String,
    },
    CatalogueLoaded {
        outcome: SourceResult<Vec<CountrySummary>>,
    },
    SearchResolved {
        token: QueryToken,
        outcome: SourceResult<Vec<CountrySummary>>,
    },
    DetailResolved {
        token: DetailToken,
        outcome: SourceResult<Option<CountryDetail>>,
    },
}
