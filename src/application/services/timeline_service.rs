use crate::application::ports::{ConnectivityProvider, Notification, Notifier, TimelineGateway};
use crate::application::services::csv_export;
use crate::application::services::entry_cache::EntryCache;
use crate::application::services::entry_store_handle::EntryStoreHandle;
use crate::application::services::pending_queue::PendingChangeQueue;
use crate::domain::entities::{
    CostSummary, EntryDetails, EntryFilter, EntryStore, PendingChange, TimelineEntry,
};
use crate::domain::value_objects::EntryId;
use crate::shared::error::AppError;
use chrono::Utc;
use std::sync::Arc;

/// Where a mutation ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Accepted by the remote.
    Remote,
    /// Applied locally and queued for the next sync.
    Queued,
}

pub struct TimelineService {
    owner_id: String,
    gateway: Arc<dyn TimelineGateway>,
    connectivity: Arc<dyn ConnectivityProvider>,
    queue: Arc<PendingChangeQueue>,
    cache: Arc<EntryCache>,
    store: EntryStoreHandle,
    notifier: Arc<dyn Notifier>,
    queue_offline_edits: bool,
}

impl TimelineService {
    pub fn new(
        owner_id: impl Into<String>,
        gateway: Arc<dyn TimelineGateway>,
        connectivity: Arc<dyn ConnectivityProvider>,
        queue: Arc<PendingChangeQueue>,
        cache: Arc<EntryCache>,
        store: EntryStoreHandle,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            owner_id: owner_id.into(),
            gateway,
            connectivity,
            queue,
            cache,
            store,
            notifier,
            queue_offline_edits: false,
        }
    }

    /// Opt in to queueing edits made while offline. Off by default: edits go
    /// straight to the remote whatever the connectivity.
    pub fn with_offline_edits(mut self, enabled: bool) -> Self {
        self.queue_offline_edits = enabled;
        self
    }

    /// Populates the store: from the remote when online, from the reload
    /// cache otherwise. Pending changes are laid over either source.
    pub async fn load(&self) -> Result<usize, AppError> {
        let pending = self.queue.drain().await;

        let entries = if self.connectivity.is_online() {
            match self.gateway.list_entries(&self.owner_id).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to fetch timeline, using local cache");
                    self.notifier.notify(Notification::warning(
                        "Không tải được nhật ký từ máy chủ, đang dùng dữ liệu đã lưu.",
                    ));
                    self.cache.load().await
                }
            }
        } else {
            self.cache.load().await
        };

        let entries = self
            .store
            .transition(|_| EntryStore::restore(entries, pending))
            .await;
        self.persist_cache(&entries).await;
        tracing::info!(count = entries.len(), "Timeline loaded");
        Ok(entries.len())
    }

    /// Refetches the list from the remote, keeping pending changes on top.
    pub async fn refresh(&self) -> Result<usize, AppError> {
        let fetched = self.gateway.list_entries(&self.owner_id).await?;
        let entries = self
            .store
            .transition(|store| store.apply_refresh(fetched))
            .await;
        self.persist_cache(&entries).await;
        Ok(entries.len())
    }

    pub async fn add(&self, details: EntryDetails) -> Result<(TimelineEntry, Delivery), AppError> {
        details.validate()?;

        if !self.connectivity.is_online() {
            let now = Utc::now();
            let ((change, local_id), entries) = self
                .store
                .transition_with(|store| {
                    let local_id = store.next_local_id(now);
                    let (next, change) = store.apply_local_add(local_id.clone(), details.clone());
                    (next, (change, local_id))
                })
                .await;
            self.persist_offline(&entries, change).await;
            tracing::info!(id = %local_id, "Entry added offline");
            self.notifier.notify(Notification::info(
                "Đã lưu hoạt động trên thiết bị, sẽ đồng bộ khi có mạng.",
            ));
            return Ok((TimelineEntry::new(local_id, details), Delivery::Queued));
        }

        match self.gateway.create_entry(&self.owner_id, &details).await {
            Ok(created) => {
                let entries = self
                    .store
                    .transition(|store| store.apply_remote_add(created.clone()))
                    .await;
                self.persist_cache(&entries).await;
                tracing::info!(id = %created.id, "Entry created");
                self.notifier
                    .notify(Notification::success("Đã thêm hoạt động vào nhật ký."));
                Ok((created, Delivery::Remote))
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to create entry");
                self.notifier
                    .notify(Notification::error(format!("Không thể thêm hoạt động: {e}")));
                Err(e)
            }
        }
    }

    /// Entries still waiting for their `add` to replay only exist locally, so
    /// their deletion is queued behind it whatever the connectivity.
    pub async fn delete(&self, id: &EntryId) -> Result<Delivery, AppError> {
        if !self.connectivity.is_online() || id.is_local() {
            let (change, entries) = self
                .store
                .transition_with(|store| store.apply_local_delete(id.clone()))
                .await;
            self.persist_offline(&entries, change).await;
            tracing::info!(id = %id, "Entry deleted offline");
            self.notifier.notify(Notification::info(
                "Đã xóa trên thiết bị, sẽ đồng bộ khi có mạng.",
            ));
            return Ok(Delivery::Queued);
        }

        match self.gateway.delete_entry(id).await {
            Ok(()) => {
                let entries = self
                    .store
                    .transition(|store| store.apply_remote_delete(id))
                    .await;
                self.persist_cache(&entries).await;
                tracing::info!(id = %id, "Entry deleted");
                self.notifier.notify(Notification::success("Đã xóa hoạt động."));
                Ok(Delivery::Remote)
            }
            Err(e) => {
                tracing::error!(id = %id, error = %e, "Failed to delete entry");
                self.notifier
                    .notify(Notification::error(format!("Không thể xóa hoạt động: {e}")));
                Err(e)
            }
        }
    }

    /// Edits are sent to the remote immediately, online or not, unless
    /// offline edits were opted into the queue. Entries that only exist
    /// locally are always queued.
    pub async fn edit(&self, entry: TimelineEntry) -> Result<(TimelineEntry, Delivery), AppError> {
        entry.details.validate()?;

        let queue_it =
            entry.id.is_local() || (self.queue_offline_edits && !self.connectivity.is_online());
        if queue_it {
            let (change, entries) = self
                .store
                .transition_with(|store| store.apply_local_edit(entry.clone()))
                .await;
            self.persist_offline(&entries, change).await;
            self.notifier.notify(Notification::info(
                "Đã lưu thay đổi trên thiết bị, sẽ đồng bộ khi có mạng.",
            ));
            return Ok((entry, Delivery::Queued));
        }

        match self.gateway.update_entry(&entry).await {
            Ok(updated) => {
                let entries = self
                    .store
                    .transition(|store| store.apply_edit(updated.clone()))
                    .await;
                self.persist_cache(&entries).await;
                tracing::info!(id = %updated.id, "Entry updated");
                self.notifier.notify(Notification::success("Đã cập nhật hoạt động."));
                Ok((updated, Delivery::Remote))
            }
            Err(e) => {
                tracing::error!(id = %entry.id, error = %e, "Failed to update entry");
                self.notifier.notify(Notification::error(format!(
                    "Không thể cập nhật hoạt động: {e}"
                )));
                Err(e)
            }
        }
    }

    pub async fn entries(&self) -> Vec<TimelineEntry> {
        self.store.entries().await
    }

    pub async fn filtered(&self, filter: &EntryFilter) -> Vec<TimelineEntry> {
        filter.apply(&self.store.entries().await)
    }

    pub async fn summary(&self, filter: &EntryFilter) -> CostSummary {
        CostSummary::from_entries(&self.filtered(filter).await)
    }

    pub async fn export_csv(&self, filter: &EntryFilter) -> String {
        csv_export::render_csv(&self.filtered(filter).await)
    }

    pub async fn has_unsynced_changes(&self) -> bool {
        self.store.has_unsynced_changes().await
    }

    pub async fn pending_changes(&self) -> Vec<PendingChange> {
        self.queue.drain().await
    }

    /// Local state is kept even when storage fails; the user is told the
    /// change may not survive a restart.
    async fn persist_offline(&self, entries: &[TimelineEntry], change: PendingChange) {
        self.persist_cache(entries).await;
        let kind = change.kind();
        if let Err(e) = self.queue.enqueue(change).await {
            tracing::error!(kind = %kind, error = %e, "Failed to queue offline change");
            self.notifier.notify(Notification::warning(
                "Không lưu được thay đổi vào bộ nhớ thiết bị.",
            ));
        }
    }

    async fn persist_cache(&self, entries: &[TimelineEntry]) {
        if let Err(e) = self.cache.save(entries).await {
            tracing::warn!(error = %e, "Failed to persist entry cache");
        }
    }
}
