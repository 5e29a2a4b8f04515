#![allow(dead_code)]

pub mod fixtures;
pub mod mocks;

use mocks::{FakeTimelineGateway, RecordingNotifier};
use nhatky_lib::application::ports::{ConnectivityProvider, LocalSlotStore};
use nhatky_lib::application::services::{
    ConnectivityMonitor, EntryCache, EntryStoreHandle, PendingChangeQueue, SyncService,
    TimelineService,
};
use nhatky_lib::infrastructure::storage::MemorySlotStore;
use nhatky_lib::shared::config::{ENTRIES_SLOT, PENDING_CHANGES_SLOT};
use std::sync::Arc;

pub const OWNER: &str = "farmer-1";

/// One device: shared storage, connectivity and the two services on top.
pub struct TestDevice {
    pub gateway: Arc<FakeTimelineGateway>,
    pub notifier: Arc<RecordingNotifier>,
    pub slots: Arc<MemorySlotStore>,
    pub monitor: Arc<ConnectivityMonitor>,
    pub queue: Arc<PendingChangeQueue>,
    pub timeline: Arc<TimelineService>,
    pub sync: Arc<SyncService>,
}

impl TestDevice {
    pub fn new(online: bool) -> Self {
        Self::with_parts(online, Arc::new(FakeTimelineGateway::default()), Arc::new(MemorySlotStore::new()))
    }

    /// A fresh process on the same device and server, as after a reload.
    pub fn reloaded(&self, online: bool) -> Self {
        Self::with_parts(online, self.gateway.clone(), self.slots.clone())
    }

    pub fn with_parts(
        online: bool,
        gateway: Arc<FakeTimelineGateway>,
        slots: Arc<MemorySlotStore>,
    ) -> Self {
        let notifier = Arc::new(RecordingNotifier::default());
        let monitor = Arc::new(ConnectivityMonitor::new(online, notifier.clone()));
        let storage: Arc<dyn LocalSlotStore> = slots.clone();
        let queue = Arc::new(PendingChangeQueue::new(storage.clone(), PENDING_CHANGES_SLOT));
        let cache = Arc::new(EntryCache::new(storage, ENTRIES_SLOT));
        let store = EntryStoreHandle::default();
        let connectivity: Arc<dyn ConnectivityProvider> = monitor.clone();

        let timeline = Arc::new(TimelineService::new(
            OWNER,
            gateway.clone(),
            connectivity,
            queue.clone(),
            cache.clone(),
            store.clone(),
            notifier.clone(),
        ));
        let sync = Arc::new(SyncService::new(
            OWNER,
            gateway.clone(),
            queue.clone(),
            cache,
            store,
            notifier.clone(),
        ));

        Self {
            gateway,
            notifier,
            slots,
            monitor,
            queue,
            timeline,
            sync,
        }
    }

    pub async fn entry_ids(&self) -> Vec<String> {
        self.timeline
            .entries()
            .await
            .into_iter()
            .map(|entry| entry.id.to_string())
            .collect()
    }
}
