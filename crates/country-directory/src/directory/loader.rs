use super::token::{GenerationTracker, ObserverId};

/// Subscription watching the sentinel for one active set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityObserver {
    pub id: ObserverId,
    pub active_set: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rebound {
    pub previous: Option<ObserverId>,
    pub current: ObserverId,
}

/// Grows the window in fixed steps when the sentinel becomes visible.
///
/// The window only ever grows. Sentinel signals are accepted only from the
/// observer bound to the current active set.
#[derive(Debug)]
pub struct IncrementalLoader {
    window: usize,
    step: usize,
    observer: Option<VisibilityObserver>,
    observers: GenerationTracker,
}

impl IncrementalLoader {
    pub fn new(initial_window: usize, step: usize) -> Self {
        Self {
            window: initial_window.max(1),
            step: step.max(1),
            observer: None,
            observers: GenerationTracker::new(),
        }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn observer(&self) -> Option<VisibilityObserver> {
        self.observer
    }

    /// Binds a fresh observer to `active_set`, disconnecting the previous one
    /// first. Returns `None` when the current observer already watches it.
    pub fn rebind(&mut self, active_set: u64) -> Option<Rebound> {
        if self
            .observer
            .is_some_and(|observer| observer.active_set == active_set)
        {
            return None;
        }
        let previous = self.disconnect();
        let current = ObserverId::mint(&mut self.observers);
        self.observer = Some(VisibilityObserver {
            id: current,
            active_set,
        });
        tracing::debug!("sentinel observer {current} bound to active set {active_set}");
        Some(Rebound { previous, current })
    }

    pub fn disconnect(&mut self) -> Option<ObserverId> {
        let previous = self.observer.take()?.id;
        tracing::trace!("sentinel observer {previous} disconnected");
        Some(previous)
    }

    /// Handles a sentinel signal. Returns the new window size, or `None` if
    /// the signal came from a disconnected observer.
    pub fn on_sentinel_visible(&mut self, observer: ObserverId) -> Option<usize> {
        let bound = self.observer?;
        if !observer.is_current(&self.observers) || bound.id != observer {
            tracing::trace!("ignoring sentinel signal from disconnected {observer}");
            return None;
        }
        self.window = self.window.saturating_add(self.step);
        Some(self.window)
    }
}
