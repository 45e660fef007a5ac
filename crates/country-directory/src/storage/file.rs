use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::task::TaskTracker;

use crate::error::{DirectoryError, Result};
use crate::storage::PreferenceStore;

pub const PREFERENCES_FILENAME: &str = "preferences.json";

/// Preferences kept in a single JSON object on disk.
///
/// `set` updates the in-memory map and hands a snapshot to a background
/// write; the caller never waits on the disk. Snapshots carry a revision
/// and an older one never overwrites a newer one. Failed writes are logged
/// and the in-memory value is kept.
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    revision: AtomicU64,
    written: Arc<tokio::sync::Mutex<u64>>,
    writes: TaskTracker,
}

impl FilePreferenceStore {
    pub fn open(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(PREFERENCES_FILENAME);
        let entries = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|error| {
                DirectoryError::Storage(format!(
                    "failed to parse preferences {}: {error}",
                    path.display()
                ))
            })?,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(error.into()),
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
            revision: AtomicU64::new(0),
            written: Arc::new(tokio::sync::Mutex::new(0)),
            writes: TaskTracker::new(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Waits until every write queued so far has reached the disk.
    pub async fn flush(&self) {
        self.writes.close();
        self.writes.wait().await;
        self.writes.reopen();
    }
}

async fn write_snapshot(
    path: PathBuf,
    bytes: Vec<u8>,
    revision: u64,
    written: Arc<tokio::sync::Mutex<u64>>,
) {
    let mut last = written.lock().await;
    if *last >= revision {
        tracing::trace!("skipping superseded preferences write {revision}");
        return;
    }
    if let Err(error) = tokio::fs::write(&path, bytes).await {
        tracing::warn!("failed to persist preferences to {}: {error}", path.display());
        return;
    }
    *last = revision;
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let (bytes, revision) = {
            let mut entries = self.entries.lock();
            if entries.get(key).map(String::as_str) == Some(value) {
                return;
            }
            entries.insert(key.to_string(), value.to_string());
            match serde_json::to_vec_pretty(&*entries) {
                Ok(bytes) => (bytes, self.revision.fetch_add(1, Ordering::Relaxed) + 1),
                Err(error) => {
                    tracing::warn!("failed to serialize preference {key}: {error}");
                    return;
                }
            }
        };

        if tokio::runtime::Handle::try_current().is_ok() {
            let write = write_snapshot(self.path.clone(), bytes, revision, self.written.clone());
            self.writes.spawn(write);
        } else if let Err(error) = std::fs::write(&self.path, bytes) {
            // No runtime to hand the write to.
            tracing::warn!(
                "failed to persist preference {key} to {}: {error}",
                self.path.display()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn on_disk(store: &FilePreferenceStore) -> BTreeMap<String, String> {
        let bytes = std::fs::read(store.path()).expect("read");
        serde_json::from_slice(&bytes).expect("json")
    }

    #[tokio::test]
    async fn set_persists_in_background() {
        let dir = tempdir().expect("tempdir");
        let store = FilePreferenceStore::open(dir.path()).expect("open");
        store.set("searchTerm", "spain");
        assert_eq!(store.get("searchTerm").as_deref(), Some("spain"));

        store.flush().await;
        assert_eq!(on_disk(&store).get("searchTerm").map(String::as_str), Some("spain"));
    }

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempdir().expect("tempdir");
        let store = FilePreferenceStore::open(dir.path()).expect("open");
        store.set("searchTerm", "spain");
        store.set("searchBy", "region");
        store.flush().await;
        drop(store);

        let reopened = FilePreferenceStore::open(dir.path()).expect("reopen");
        assert_eq!(reopened.get("searchTerm").as_deref(), Some("spain"));
        assert_eq!(reopened.get("searchBy").as_deref(), Some("region"));
    }

    #[tokio::test]
    async fn rapid_sets_leave_latest_value_on_disk() {
        let dir = tempdir().expect("tempdir");
        let store = FilePreferenceStore::open(dir.path()).expect("open");
        for term in ["G", "Ge", "Ger", "Germ", "Germany"] {
            store.set("searchTerm", term);
        }
        store.flush().await;
        assert_eq!(
            on_disk(&store).get("searchTerm").map(String::as_str),
            Some("Germany")
        );
    }

    #[test]
    fn set_without_runtime_writes_directly() {
        let dir = tempdir().expect("tempdir");
        let store = FilePreferenceStore::open(dir.path()).expect("open");
        store.set("searchBy", "lang");
        assert_eq!(on_disk(&store).get("searchBy").map(String::as_str), Some("lang"));
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempdir().expect("tempdir");
        let store = FilePreferenceStore::open(dir.path()).expect("open");
        assert!(store.get("searchTerm").is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn corrupt_file_is_rejected() {
        let dir = tempdir().expect("tempdir");
        std::fs::write(dir.path().join(PREFERENCES_FILENAME), "[1, 2").expect("write");
        let err = FilePreferenceStore::open(dir.path()).expect_err("corrupt");
        assert!(matches!(err, DirectoryError::Storage(_)));
    }
}
