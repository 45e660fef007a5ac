use tokio::sync::{broadcast, mpsc, oneshot};

use super::actor::DirectoryActor;
use super::protocol::DirectoryEvent;
use super::token::ObserverId;
use super::view::DirectoryView;
use crate::bus::Bus;
use crate::config::DirectoryConfig;
use crate::error::{DirectoryError, Result};
use crate::event::DirectoryUpdate;
use crate::source::DirectorySources;
use crate::storage::SharedPreferences;
use crate::types::SearchCriterion;

/// Cloneable front door to a running directory controller.
///
/// All calls only enqueue work; their effects become visible through
/// [`DirectoryHandle::snapshot`] and the update bus.
#[derive(Clone)]
pub struct DirectoryHandle {
    event_tx: mpsc::UnboundedSender<DirectoryEvent>,
    bus: Bus,
}

impl DirectoryHandle {
    pub fn is_closed(&self) -> bool {
        self.event_tx.is_closed()
    }

    /// Raw search-box contents, one call per keystroke.
    pub fn input(&self, text: impl Into<String>) -> Result<()> {
        self.send(DirectoryEvent::Input { text: text.into() })
    }

    pub fn clear_search(&self) -> Result<()> {
        self.input(String::new())
    }

    pub fn set_criterion(&self, criterion: SearchCriterion) -> Result<()> {
        self.send(DirectoryEvent::SetCriterion { criterion })
    }

    /// The sentinel watched by `observer` scrolled into view.
    pub fn sentinel_visible(&self, observer: ObserverId) -> Result<()> {
        self.send(DirectoryEvent::SentinelVisible { observer })
    }

    pub fn select(&self, name: impl Into<String>) -> Result<()> {
        self.send(DirectoryEvent::Select { name: name.into() })
    }

    pub fn close(&self) -> Result<()> {
        self.send(DirectoryEvent::Close)
    }

    pub async fn snapshot(&self) -> Result<DirectoryView> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(DirectoryEvent::Snapshot { reply })?;
        reply_rx.await.map_err(|_| DirectoryError::Stopped)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryUpdate> {
        self.bus.subscribe()
    }

    /// Stops the controller, cancelling the pending debounce timer.
    /// In-flight fetches finish on their own and are dropped.
    pub async fn shutdown(&self) -> Result<()> {
        let (reply, reply_rx) = oneshot::channel();
        self.send(DirectoryEvent::Shutdown { reply })?;
        reply_rx.await.map_err(|_| DirectoryError::Stopped)
    }

    fn send(&self, event: DirectoryEvent) -> Result<()> {
        self.event_tx
            .send(event)
            .map_err(|_| DirectoryError::Stopped)
    }
}

/// Starts a directory controller on the current tokio runtime. The
/// catalogue fetch and the restored search (if any) start immediately.
pub fn spawn_directory(
    config: &DirectoryConfig,
    sources: DirectorySources,
    preferences: SharedPreferences,
) -> DirectoryHandle {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let bus = Bus::new(config.bus_capacity);

    let actor = DirectoryActor::new(
        config,
        sources,
        preferences,
        bus.clone(),
        event_tx.downgrade(),
        event_rx,
    );

    tokio::spawn(async move {
        actor.run().await;
    });

    DirectoryHandle { event_tx, bus }
}
