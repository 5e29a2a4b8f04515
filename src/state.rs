use crate::application::ports::{ConnectivityProvider, LocalSlotStore, Notifier, TimelineGateway};
use crate::application::services::{
    ConnectivityMonitor, EntryCache, EntryStoreHandle, PendingChangeQueue, SyncService,
    TimelineService,
};
use crate::infrastructure::api::HttpTimelineGateway;
use crate::infrastructure::connectivity::HttpConnectivityProbe;
use crate::infrastructure::database::ConnectionPool;
use crate::infrastructure::notification::TracingNotifier;
use crate::infrastructure::storage::{MemorySlotStore, SqliteSlotStore};
use crate::shared::config::AppConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, Default)]
pub struct StateOptions {
    /// Start offline and never probe the remote.
    pub force_offline: bool,
    /// Keep queue and cache in memory instead of SQLite.
    pub ephemeral: bool,
}

/// Everything one process needs, wired once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub options: StateOptions,
    pub gateway: HttpTimelineGateway,
    pub monitor: Arc<ConnectivityMonitor>,
    pub timeline: Arc<TimelineService>,
    pub sync: Arc<SyncService>,
    pool: Option<ConnectionPool>,
}

impl AppState {
    pub async fn new(config: AppConfig, options: StateOptions) -> anyhow::Result<Self> {
        config.validate().map_err(anyhow::Error::msg)?;

        let (slots, pool): (Arc<dyn LocalSlotStore>, Option<ConnectionPool>) = if options.ephemeral
        {
            tracing::info!("Using in-memory local storage");
            (Arc::new(MemorySlotStore::new()), None)
        } else {
            let pool =
                ConnectionPool::new(&config.database.url, config.database.max_connections).await?;
            pool.migrate().await?;
            (Arc::new(SqliteSlotStore::new(pool.clone())), Some(pool))
        };

        let gateway = HttpTimelineGateway::new(
            config.remote.base_url.clone(),
            Duration::from_secs(config.remote.connect_timeout),
        )?;

        let initially_online = if options.force_offline {
            false
        } else {
            gateway.probe().await
        };
        tracing::info!(online = initially_online, base_url = %gateway.base_url(), "Initial connectivity");

        let notifier: Arc<dyn Notifier> = Arc::new(TracingNotifier);
        let monitor = Arc::new(ConnectivityMonitor::new(initially_online, notifier.clone()));
        let remote: Arc<dyn TimelineGateway> = Arc::new(gateway.clone());
        let connectivity: Arc<dyn ConnectivityProvider> = monitor.clone();
        let queue = Arc::new(PendingChangeQueue::new(
            slots.clone(),
            config.storage.queue_slot.clone(),
        ));
        let cache = Arc::new(EntryCache::new(slots, config.storage.entries_slot.clone()));
        let store = EntryStoreHandle::default();

        let timeline = Arc::new(
            TimelineService::new(
                config.remote.owner_id.clone(),
                remote.clone(),
                connectivity,
                queue.clone(),
                cache.clone(),
                store.clone(),
                notifier.clone(),
            )
            .with_offline_edits(config.sync.queue_offline_edits),
        );
        let sync = Arc::new(SyncService::new(
            config.remote.owner_id.clone(),
            remote,
            queue,
            cache,
            store,
            notifier,
        ));

        Ok(Self {
            config,
            options,
            gateway,
            monitor,
            timeline,
            sync,
            pool,
        })
    }

    pub fn is_online(&self) -> bool {
        self.monitor.is_online()
    }

    /// Starts the health-check loop unless the session is forced offline.
    pub fn spawn_probe(&self) -> Option<JoinHandle<()>> {
        if self.options.force_offline {
            return None;
        }
        let probe = HttpConnectivityProbe::new(
            self.gateway.clone(),
            self.monitor.clone(),
            Duration::from_secs(self.config.sync.probe_interval),
        );
        Some(probe.spawn())
    }

    /// Drains the queue on every reconnect when auto sync is on.
    pub fn spawn_reconnect_listener(&self) -> Option<JoinHandle<()>> {
        if !self.config.sync.auto_sync {
            return None;
        }
        Some(self.sync.clone().spawn_reconnect_listener(self.monitor.subscribe()))
    }

    pub async fn shutdown(&self) {
        self.monitor.close();
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
