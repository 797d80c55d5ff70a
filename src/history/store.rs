//! History persistence with local fallback.

use std::sync::Arc;

use tracing::{info, warn};

use super::{HISTORY_LIMIT, HistoryEntry, HistoryList, RemoteHistory};
use crate::storage::{HISTORY_KEY, LocalStorage};

/// Reads and writes history, preferring the remote store.
///
/// None of the operations fail from the caller's point of view: remote
/// errors are logged and the local storage is used instead.
#[derive(Clone)]
pub struct HistoryStore {
    remote: Option<Arc<dyn RemoteHistory>>,
    local: Arc<LocalStorage>,
}

impl HistoryStore {
    pub fn new(remote: Option<Arc<dyn RemoteHistory>>, local: Arc<LocalStorage>) -> Self {
        Self { remote, local }
    }

    pub fn local_only(local: Arc<LocalStorage>) -> Self {
        Self::new(None, local)
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Load the most recent entries, newest first.
    pub async fn load(&self) -> HistoryList {
        if let Some(remote) = &self.remote {
            match remote.fetch_recent(HISTORY_LIMIT).await {
                Ok(entries) => {
                    info!(count = entries.len(), "Loaded history from remote store");
                    return HistoryList::from_entries(entries);
                }
                Err(e) => warn!(error = %e, "Remote history unavailable, using local storage"),
            }
        }

        let list = self.load_local();
        info!(count = list.len(), "Loaded history from local storage");
        list
    }

    /// Persist a new entry. `snapshot` is the full in-memory list after the
    /// entry was added; it is what gets written locally if the remote fails.
    pub async fn record(&self, entry: &HistoryEntry, snapshot: &HistoryList) {
        if let Some(remote) = &self.remote {
            match remote.insert(entry).await {
                Ok(()) => return,
                Err(e) => warn!(error = %e, "Remote insert failed, writing history locally"),
            }
        }

        self.save_local(snapshot);
    }

    /// Delete all history, remote and local.
    pub async fn clear(&self) {
        if let Some(remote) = &self.remote
            && let Err(e) = remote.delete_all().await
        {
            warn!(error = %e, "Remote delete failed, clearing local history only");
        }

        if let Err(e) = self.local.remove(HISTORY_KEY) {
            warn!(error = %e, "Failed to clear local history");
        }
    }

    /// Read the fallback copy from local storage.
    pub fn load_local(&self) -> HistoryList {
        let Some(raw) = self.local.get(HISTORY_KEY) else {
            return HistoryList::new();
        };

        match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
            Ok(entries) => HistoryList::from_entries(entries),
            Err(e) => {
                warn!(error = %e, "Ignoring corrupt local history");
                HistoryList::new()
            }
        }
    }

    fn save_local(&self, list: &HistoryList) {
        let result = serde_json::to_string(list.entries())
            .map_err(crate::Error::from)
            .and_then(|json| self.local.set(HISTORY_KEY, json));

        if let Err(e) = result {
            warn!(error = %e, "Failed to write local history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRemote {
        rows: Mutex<Vec<HistoryEntry>>,
    }

    #[async_trait]
    impl RemoteHistory for RecordingRemote {
        async fn insert(&self, entry: &HistoryEntry) -> Result<()> {
            let mut entry = entry.clone();
            let mut rows = self.rows.lock().unwrap();
            entry.id = Some(format!("row-{}", rows.len()));
            rows.push(entry);
            Ok(())
        }

        async fn fetch_recent(&self, limit: usize) -> Result<Vec<HistoryEntry>> {
            let mut rows = self.rows.lock().unwrap().clone();
            rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
            rows.truncate(limit);
            Ok(rows)
        }

        async fn delete_all(&self) -> Result<()> {
            self.rows.lock().unwrap().clear();
            Ok(())
        }
    }

    struct UnreachableRemote;

    #[async_trait]
    impl RemoteHistory for UnreachableRemote {
        async fn insert(&self, _entry: &HistoryEntry) -> Result<()> {
            Err(Error::RemoteUnavailable)
        }

        async fn fetch_recent(&self, _limit: usize) -> Result<Vec<HistoryEntry>> {
            Err(Error::RemoteUnavailable)
        }

        async fn delete_all(&self) -> Result<()> {
            Err(Error::RemoteUnavailable)
        }
    }

    fn push(list: &mut HistoryList, expression: &str, result: &str) -> HistoryEntry {
        let entry = HistoryEntry::new(expression, result);
        list.push(entry.clone());
        entry
    }

    #[tokio::test]
    async fn test_remote_round_trip() {
        let remote = Arc::new(RecordingRemote::default());
        let local = Arc::new(LocalStorage::in_memory());
        let store = HistoryStore::new(Some(remote.clone()), local.clone());

        let mut list = HistoryList::new();
        let entry = push(&mut list, "2 + 3 × 4", "20");
        store.record(&entry, &list).await;

        let loaded = store.load().await;
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get(0).unwrap().result, "20");
        assert_eq!(loaded.get(0).unwrap().id.as_deref(), Some("row-0"));
        assert!(local.get(HISTORY_KEY).is_none());
    }

    #[tokio::test]
    async fn test_unreachable_remote_falls_back_across_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        {
            let store = HistoryStore::new(
                Some(Arc::new(UnreachableRemote)),
                Arc::new(LocalStorage::open(&path)),
            );
            let mut list = HistoryList::new();
            let first = push(&mut list, "1 + 1", "2");
            store.record(&first, &list).await;
            let second = push(&mut list, "5 × 5", "25");
            store.record(&second, &list).await;
        }

        let reloaded = HistoryStore::new(
            Some(Arc::new(UnreachableRemote)),
            Arc::new(LocalStorage::open(&path)),
        );
        let loaded = reloaded.load().await;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(0).unwrap().expression, "5 × 5");
        assert_eq!(loaded.get(1).unwrap().expression, "1 + 1");
    }

    #[tokio::test]
    async fn test_local_only_store() {
        let store = HistoryStore::local_only(Arc::new(LocalStorage::in_memory()));
        assert!(!store.has_remote());

        let mut list = HistoryList::new();
        let entry = push(&mut list, "9 ÷ 3", "3");
        store.record(&entry, &list).await;
        assert_eq!(store.load().await, list);
    }

    #[tokio::test]
    async fn test_clear_removes_remote_and_local() {
        let remote = Arc::new(RecordingRemote::default());
        let local = Arc::new(LocalStorage::in_memory());
        local.set(HISTORY_KEY, "[]").unwrap();
        let store = HistoryStore::new(Some(remote.clone()), local.clone());

        let mut list = HistoryList::new();
        let entry = push(&mut list, "1 + 2", "3");
        store.record(&entry, &list).await;
        store.clear().await;

        assert!(remote.rows.lock().unwrap().is_empty());
        assert!(local.get(HISTORY_KEY).is_none());
    }

    #[tokio::test]
    async fn test_clear_with_unreachable_remote_clears_local() {
        let local = Arc::new(LocalStorage::in_memory());
        let store = HistoryStore::new(Some(Arc::new(UnreachableRemote)), local.clone());

        let mut list = HistoryList::new();
        let entry = push(&mut list, "1 + 2", "3");
        store.record(&entry, &list).await;
        assert!(local.get(HISTORY_KEY).is_some());

        store.clear().await;
        assert!(local.get(HISTORY_KEY).is_none());
        assert!(store.load().await.is_empty());
    }

    #[test]
    fn test_corrupt_local_history_is_empty() {
        let local = Arc::new(LocalStorage::in_memory());
        local.set(HISTORY_KEY, "not json").unwrap();
        assert!(HistoryStore::local_only(local).load_local().is_empty());
    }
}
