use crate::application::ports::{ConnectivityEvent, Notification, Notifier, TimelineGateway};
use crate::application::services::entry_cache::EntryCache;
use crate::application::services::entry_store_handle::EntryStoreHandle;
use crate::application::services::pending_queue::PendingChangeQueue;
use crate::domain::entities::{PendingChange, TimelineEntry};
use crate::domain::value_objects::EntryId;
use crate::shared::error::AppError;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncStatus {
    pub is_syncing: bool,
    pub pending_changes: usize,
    pub drain_attempts: u64,
    pub last_sync: Option<i64>,
    pub last_error: Option<String>,
    pub sync_errors: u32,
    /// Triggers that arrived while a drain was running; each one gets its own
    /// drain once the current one finishes.
    pub pending_reruns: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    NothingToSync,
    Synced {
        replayed: usize,
    },
    /// Replay stopped at the first failing change. The `replayed` changes
    /// before it were dropped from the queue; `remaining` counts everything
    /// still queued, including changes made while the drain ran.
    Failed {
        replayed: usize,
        remaining: usize,
        error: String,
    },
    AlreadyRunning,
}

/// Replays the pending-change queue against the remote.
#[derive(Clone)]
pub struct SyncService {
    owner_id: String,
    gateway: Arc<dyn TimelineGateway>,
    queue: Arc<PendingChangeQueue>,
    cache: Arc<EntryCache>,
    store: EntryStoreHandle,
    notifier: Arc<dyn Notifier>,
    status: Arc<RwLock<SyncStatus>>,
}

impl SyncService {
    pub fn new(
        owner_id: impl Into<String>,
        gateway: Arc<dyn TimelineGateway>,
        queue: Arc<PendingChangeQueue>,
        cache: Arc<EntryCache>,
        store: EntryStoreHandle,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            gateway,
            queue,
            cache,
            store,
            notifier,
            status: Arc::new(RwLock::new(SyncStatus::default())),
        }
    }

    pub async fn get_status(&self) -> SyncStatus {
        let mut status = self.status.read().await.clone();
        status.pending_changes = self.queue.len().await;
        status
    }

    /// Runs a drain and returns its outcome. A trigger that arrives while a
    /// drain is running gets [`SyncOutcome::AlreadyRunning`] and is queued as
    /// a rerun; the running call drains once more per queued trigger before
    /// it returns.
    pub async fn sync_now(&self) -> Result<SyncOutcome, AppError> {
        {
            let mut status = self.status.write().await;
            if status.is_syncing {
                status.pending_reruns += 1;
                tracing::debug!(pending_reruns = status.pending_reruns, "Drain running, rerun queued");
                return Ok(SyncOutcome::AlreadyRunning);
            }
            status.is_syncing = true;
            status.drain_attempts += 1;
        }

        let result = self.drain().await;
        let mut rerun = self.finish_drain(&result).await;
        while rerun {
            let outcome = self.drain().await;
            match &outcome {
                Ok(outcome) => tracing::debug!(?outcome, "Rerun drain finished"),
                Err(e) => tracing::error!(error = %e, "Rerun drain error"),
            }
            rerun = self.finish_drain(&outcome).await;
        }

        result
    }

    /// Records a finished drain. Returns true when a queued rerun was claimed,
    /// in which case `is_syncing` stays set.
    async fn finish_drain(&self, result: &Result<SyncOutcome, AppError>) -> bool {
        let mut status = self.status.write().await;
        match result {
            Ok(SyncOutcome::Synced { .. }) | Ok(SyncOutcome::NothingToSync) => {
                status.last_sync = Some(chrono::Utc::now().timestamp());
                status.last_error = None;
            }
            Ok(SyncOutcome::Failed { error, .. }) => {
                status.sync_errors += 1;
                status.last_error = Some(error.clone());
            }
            Ok(SyncOutcome::AlreadyRunning) => {}
            Err(e) => {
                status.sync_errors += 1;
                status.last_error = Some(e.to_string());
            }
        }

        if status.pending_reruns > 0 {
            status.pending_reruns -= 1;
            status.drain_attempts += 1;
            true
        } else {
            status.is_syncing = false;
            false
        }
    }

    /// Runs one drain per `Online` transition, in order, until the channel
    /// closes.
    pub fn spawn_reconnect_listener(
        self: Arc<Self>,
        mut events: mpsc::UnboundedReceiver<ConnectivityEvent>,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                if event != ConnectivityEvent::Online {
                    continue;
                }
                match self.sync_now().await {
                    Ok(outcome) => tracing::debug!(?outcome, "Reconnect sync finished"),
                    Err(e) => tracing::error!(error = %e, "Reconnect sync error"),
                }
            }
            tracing::debug!("Reconnect listener stopped");
        })
    }

    async fn drain(&self) -> Result<SyncOutcome, AppError> {
        let changes = self.queue.drain().await;
        if changes.is_empty() {
            return Ok(SyncOutcome::NothingToSync);
        }

        tracing::info!(count = changes.len(), "Replaying pending changes");
        let mut mapping: HashMap<EntryId, EntryId> = HashMap::new();

        for (index, change) in changes.iter().enumerate() {
            let change = change.clone().remapped(&mapping);
            let kind = change.kind();
            let target = change.target_id().clone();

            if let Err(e) = self.replay(change, &mut mapping).await {
                tracing::error!(
                    index,
                    kind = %kind,
                    target = %target,
                    error = %e,
                    "Pending change replay failed"
                );
                return self.abort(&changes, index, &mapping, e).await;
            }
            self.store.transition(|store| store.apply_replayed(1)).await;
        }

        let leftover = self.queue.remove_front(changes.len(), &mapping).await?;
        if !leftover.is_empty() {
            tracing::info!(count = leftover.len(), "Changes queued during sync stay pending");
        }
        let entries = self
            .store
            .transition(|store| store.remap_pending(&mapping))
            .await;

        match self.gateway.list_entries(&self.owner_id).await {
            Ok(fresh) => {
                let entries = self
                    .store
                    .transition(|store| store.apply_refresh(fresh))
                    .await;
                self.persist_cache(&entries).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Refetch after sync failed");
                self.persist_cache(&entries).await;
                self.notifier.notify(Notification::warning(
                    "Đã đồng bộ nhưng chưa tải lại được danh sách.",
                ));
            }
        }

        tracing::info!(replayed = changes.len(), "Pending changes synced");
        self.notifier.notify(Notification::success(format!(
            "Đã đồng bộ {} thay đổi.",
            changes.len()
        )));
        Ok(SyncOutcome::Synced {
            replayed: changes.len(),
        })
    }

    async fn replay(
        &self,
        change: PendingChange,
        mapping: &mut HashMap<EntryId, EntryId>,
    ) -> Result<(), AppError> {
        match change {
            PendingChange::Add(add) => {
                let created = self.gateway.create_entry(&self.owner_id, &add.entry).await?;
                tracing::debug!(local = %add.local_id, server = %created.id, "Swapping local id");
                mapping.insert(add.local_id.clone(), created.id.clone());
                self.store
                    .transition(|store| store.apply_id_swap(&add.local_id, created))
                    .await;
            }
            PendingChange::Update(entry) => {
                if entry.id.is_local() {
                    tracing::debug!(id = %entry.id, "Skipping update of an entry the server never saw");
                    return Ok(());
                }
                let updated = self.gateway.update_entry(&entry).await?;
                self.store
                    .transition(|store| store.apply_edit(updated))
                    .await;
            }
            PendingChange::Delete(id) => {
                if id.is_local() {
                    tracing::debug!(id = %id, "Skipping delete of an entry the server never saw");
                    return Ok(());
                }
                match self.gateway.delete_entry(&id).await {
                    Ok(()) => {}
                    Err(AppError::NotFound(_)) => {
                        tracing::debug!(id = %id, "Entry already gone on the server");
                    }
                    Err(e) => return Err(e),
                }
                self.store
                    .transition(|store| store.apply_remote_delete(&id))
                    .await;
            }
        }
        Ok(())
    }

    async fn abort(
        &self,
        changes: &[PendingChange],
        failed_at: usize,
        mapping: &HashMap<EntryId, EntryId>,
        error: AppError,
    ) -> Result<SyncOutcome, AppError> {
        let remaining: Vec<PendingChange> = changes[failed_at..]
            .iter()
            .cloned()
            .map(|change| change.remapped(mapping))
            .collect();

        let queued = self
            .queue
            .replace_front(changes.len(), &remaining, mapping)
            .await?;
        let entries = self
            .store
            .transition(|store| store.remap_pending(mapping))
            .await;
        self.persist_cache(&entries).await;

        self.notifier.notify(Notification::error(format!(
            "Đồng bộ thất bại, còn {} thay đổi chưa gửi: {error}",
            queued.len()
        )));

        Ok(SyncOutcome::Failed {
            replayed: failed_at,
            remaining: queued.len(),
            error: error.to_string(),
        })
    }

    async fn persist_cache(&self, entries: &[TimelineEntry]) {
        if let Err(e) = self.cache.save(entries).await {
            tracing::warn!(error = %e, "Failed to persist entry cache");
        }
    }
}
