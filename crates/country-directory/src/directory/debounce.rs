use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Turns keystrokes into committed search terms.
///
/// Every input restarts a single timer; only the value present when the
/// timer runs out is committed. A commit equal to the previous one is
/// dropped. Pending timers are cancelled on teardown and on drop.
#[derive(Debug)]
pub struct SearchDebouncer {
    interval: Duration,
    generation: u64,
    pending: Option<CancellationToken>,
    committed: String,
}

impl SearchDebouncer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            generation: 0,
            pending: None,
            committed: String::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Last committed term.
    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Restarts the quiescence timer for `term`. `on_quiet` runs on the
    /// timer task with the generation it was armed for; hand that back to
    /// [`SearchDebouncer::commit`].
    pub fn input<F>(&mut self, term: String, on_quiet: F)
    where
        F: FnOnce(u64, String) + Send + 'static,
    {
        self.cancel_pending();
        self.generation += 1;
        let generation = self.generation;
        let cancel = CancellationToken::new();
        let timer_cancel = cancel.clone();
        let interval = self.interval;
        tokio::spawn(async move {
            tokio::select! {
                _ = timer_cancel.cancelled() => {}
                _ = tokio::time::sleep(interval) => on_quiet(generation, term),
            }
        });
        self.pending = Some(cancel);
    }

    /// Accepts a fired timer. Returns the term to search for, or `None` if
    /// the timer was superseded or the term did not change.
    pub fn commit(&mut self, generation: u64, term: String) -> Option<String> {
        if generation != self.generation {
            tracing::trace!("dropping superseded debounce timer {generation}");
            return None;
        }
        self.pending = None;
        if term == self.committed {
            return None;
        }
        self.committed = term.clone();
        Some(term)
    }

    pub fn teardown(&mut self) {
        self.cancel_pending();
        self.generation += 1;
    }

    fn cancel_pending(&mut self) {
        if let Some(cancel) = self.pending.take() {
            cancel.cancel();
        }
    }
}

impl Drop for SearchDebouncer {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
