use tokio::sync::broadcast;

use crate::event::DirectoryUpdate;

/// Fan-out of [`DirectoryUpdate`]s from the directory actor to any number of
/// presentation subscribers.
///
/// Updates are hints to re-render; a subscriber that lags behind loses the
/// oldest ones and should fall back to a fresh snapshot.
#[derive(Clone)]
pub struct Bus {
    sender: broadcast::Sender<DirectoryUpdate>,
}

impl Bus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DirectoryUpdate> {
        self.sender.subscribe()
    }

    /// Sends `update` to current subscribers and returns how many there
    /// were. Errors only when nobody is listening.
    pub fn publish(
        &self,
        update: DirectoryUpdate,
    ) -> Result<usize, broadcast::error::SendError<DirectoryUpdate>> {
        self.sender.send(update)
    }
}
