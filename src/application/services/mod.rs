pub mod connectivity_monitor;
pub mod csv_export;
pub mod entry_cache;
pub mod entry_store_handle;
pub mod pending_queue;
pub mod sync_service;
pub mod timeline_service;

pub use connectivity_monitor::ConnectivityMonitor;
pub use entry_cache::EntryCache;
pub use entry_store_handle::EntryStoreHandle;
pub use pending_queue::PendingChangeQueue;
pub use sync_service::{SyncOutcome, SyncService, SyncStatus};
pub use timeline_service::{Delivery, TimelineService};
