use serde::Serialize;

use crate::error::SourceResult;
use crate::types::CountryDetail;

use super::token::{DetailToken, GenerationTracker};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    Closed,
    Loading { token: DetailToken, name: String },
    Open { detail: Box<CountryDetail> },
}

/// Compact form of [`SelectionState`] for update events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum SelectionStatus {
    Closed,
    Loading { name: String },
    Open { name: String },
}

impl From<&SelectionState> for SelectionStatus {
    fn from(state: &SelectionState) -> Self {
        match state {
            SelectionState::Closed => SelectionStatus::Closed,
            SelectionState::Loading { name, .. } => SelectionStatus::Loading { name: name.clone() },
            SelectionState::Open { detail } => SelectionStatus::Open {
                name: detail.name().to_string(),
            },
        }
    }
}

/// UI flags owned by the controller and read by the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub scroll_locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailResolution {
    /// A newer selection (or a close) happened since this fetch was issued.
    Stale,
    Opened,
    /// Not found or failed; the view went back to closed.
    Reverted,
}

/// Single detail-view selection: Closed → Loading → Open → Closed.
///
/// The scroll lock mirrors "view is open" and is flipped exactly once per
/// open or close transition.
#[derive(Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    ui: UiState,
    tokens: GenerationTracker,
    lock_toggles: u64,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn ui(&self) -> UiState {
        self.ui
    }

    /// Number of times the scroll lock has been flipped.
    pub fn lock_toggles(&self) -> u64 {
        self.lock_toggles
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, SelectionState::Open { .. })
    }

    /// Starts loading `name`. Any earlier fetch becomes stale and an open
    /// view closes until the new record arrives.
    pub fn select(&mut self, name: &str) -> DetailToken {
        let token = DetailToken::mint(&mut self.tokens);
        self.state = SelectionState::Loading {
            token,
            name: name.to_string(),
        };
        self.set_scroll_lock(false);
        token
    }

    pub fn resolve(
        &mut self,
        token: DetailToken,
        outcome: SourceResult<Option<CountryDetail>>,
    ) -> DetailResolution {
        let name = match &self.state {
            SelectionState::Loading { token: pending, name }
                if *pending == token && token.is_current(&self.tokens) =>
            {
                name.clone()
            }
            _ => {
                tracing::trace!("discarding stale detail result {token}");
                return DetailResolution::Stale;
            }
        };

        match outcome {
            Ok(Some(detail)) => {
                self.state = SelectionState::Open {
                    detail: Box::new(detail),
                };
                self.set_scroll_lock(true);
                DetailResolution::Opened
            }
            Ok(None) => {
                tracing::info!("country {name} not found; closing detail view");
                self.state = SelectionState::Closed;
                DetailResolution::Reverted
            }
            Err(error) => {
                tracing::warn!("detail fetch for {name} failed: {error}");
                self.state = SelectionState::Closed;
                DetailResolution::Reverted
            }
        }
    }

    /// Closes the view and forgets any pending fetch. Returns `true` if the
    /// state changed.
    pub fn close(&mut self) -> bool {
        if self.state == SelectionState::Closed {
            return false;
        }
        self.tokens.next();
        self.state = SelectionState::Closed;
        self.set_scroll_lock(false);
        true
    }

    fn set_scroll_lock(&mut self, locked: bool) {
        if self.ui.scroll_locked != locked {
            self.ui.scroll_locked = locked;
            self.lock_toggles += 1;
        }
    }
}
