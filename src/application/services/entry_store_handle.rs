use crate::domain::entities::{EntryStore, TimelineEntry};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared owner of the [`EntryStore`]. Each transition runs under the write
/// lock, so no other task observes a half-applied change.
#[derive(Clone, Default)]
pub struct EntryStoreHandle {
    inner: Arc<RwLock<EntryStore>>,
}

impl EntryStoreHandle {
    pub fn new(store: EntryStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    pub async fn entries(&self) -> Vec<TimelineEntry> {
        self.inner.read().await.entries().to_vec()
    }

    pub async fn has_unsynced_changes(&self) -> bool {
        self.inner.read().await.has_unsynced_changes()
    }

    /// Applies `f` and returns the resulting entry list, ready to be cached.
    pub async fn transition<F>(&self, f: F) -> Vec<TimelineEntry>
    where
        F: FnOnce(EntryStore) -> EntryStore,
    {
        let mut guard = self.inner.write().await;
        let current = std::mem::take(&mut *guard);
        *guard = f(current);
        guard.entries().to_vec()
    }

    /// Like [`transition`](Self::transition) for transitions that also yield a value.
    pub async fn transition_with<F, T>(&self, f: F) -> (T, Vec<TimelineEntry>)
    where
        F: FnOnce(EntryStore) -> (EntryStore, T),
    {
        let mut guard = self.inner.write().await;
        let current = std::mem::take(&mut *guard);
        let (next, value) = f(current);
        *guard = next;
        (value, guard.entries().to_vec())
    }
}
