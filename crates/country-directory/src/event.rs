use serde::Serialize;

use crate::directory::{ObserverId, QueryToken, SelectionStatus};
use crate::types::SearchCriterion;

/// State changes published to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DirectoryUpdate {
    #[serde(rename_all = "camelCase")]
    ResultsChanged {
        displayed: usize,
        active: usize,
        total: usize,
        window: usize,
        no_results: bool,
    },
    /// The sentinel must now be watched through `current`; signals tagged
    /// with `previous` are ignored from here on.
    ObserverRebound {
        previous: Option<ObserverId>,
        current: ObserverId,
    },
    SearchIssued {
        token: QueryToken,
        criterion: SearchCriterion,
        term: String,
    },
    SelectionChanged {
        selection: SelectionStatus,
    },
    ScrollLockChanged {
        locked: bool,
    },
}
