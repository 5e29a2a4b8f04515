use crate::application::ports::LocalSlotStore;
use crate::domain::entities::PendingChange;
use crate::domain::value_objects::EntryId;
use crate::shared::error::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Durable FIFO of changes made while offline.
///
/// Reads fail open: a missing slot, a storage error or malformed JSON all read
/// as an empty queue. The read-modify-write in `enqueue` is serialized within
/// this process; other processes sharing the slot are last-writer-wins.
pub struct PendingChangeQueue {
    store: Arc<dyn LocalSlotStore>,
    slot: String,
    write_lock: Mutex<()>,
}

impl PendingChangeQueue {
    pub fn new(store: Arc<dyn LocalSlotStore>, slot: impl Into<String>) -> Self {
        Self {
            store,
            slot: slot.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub async fn enqueue(&self, change: PendingChange) -> Result<usize, AppError> {
        let _guard = self.write_lock.lock().await;
        let mut changes = self.read().await;
        changes.push(change);
        self.write(&changes).await?;
        tracing::debug!(slot = %self.slot, queued = changes.len(), "Pending change enqueued");
        Ok(changes.len())
    }

    /// The full queue in apply order. Does not remove anything; pair with
    /// [`PendingChangeQueue::remove_front`] once the replay succeeded.
    pub async fn drain(&self) -> Vec<PendingChange> {
        self.read().await
    }

    /// Drops the first `consumed` changes and rewrites ids in what is left.
    /// Changes enqueued after the caller's `drain` are kept.
    pub async fn remove_front(
        &self,
        consumed: usize,
        mapping: &HashMap<EntryId, EntryId>,
    ) -> Result<Vec<PendingChange>, AppError> {
        self.replace_front(consumed, &[], mapping).await
    }

    /// Swaps the first `consumed` changes for `replacement`, keeping the
    /// tail enqueued since the caller's `drain` with its ids rewritten.
    pub async fn replace_front(
        &self,
        consumed: usize,
        replacement: &[PendingChange],
        mapping: &HashMap<EntryId, EntryId>,
    ) -> Result<Vec<PendingChange>, AppError> {
        let _guard = self.write_lock.lock().await;
        let current = self.read().await;
        let tail = current
            .into_iter()
            .skip(consumed)
            .map(|change| change.remapped(mapping));
        let changes: Vec<PendingChange> = replacement.iter().cloned().chain(tail).collect();
        self.write(&changes).await?;
        tracing::debug!(slot = %self.slot, consumed, queued = changes.len(), "Pending queue front replaced");
        Ok(changes)
    }

    pub async fn len(&self) -> usize {
        self.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn read(&self) -> Vec<PendingChange> {
        let raw = match self.store.read_slot(&self.slot).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(slot = %self.slot, error = %e, "Pending queue unreadable, treating as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<PendingChange>>(&raw) {
            Ok(changes) => changes,
            Err(e) => {
                tracing::warn!(slot = %self.slot, error = %e, "Pending queue is malformed, treating as empty");
                Vec::new()
            }
        }
    }

    async fn write(&self, changes: &[PendingChange]) -> Result<(), AppError> {
        let raw = serde_json::to_string(changes)?;
        self.store.write_slot(&self.slot, &raw).await
    }
}
