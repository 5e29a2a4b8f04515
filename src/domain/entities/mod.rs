pub mod entry_filter;
pub mod entry_store;
pub mod pending_change;
pub mod timeline_entry;

pub use entry_filter::EntryFilter;
pub use entry_store::{EntryStore, SyncState};
pub use pending_change::{ChangeKind, PendingAdd, PendingChange};
pub use timeline_entry::{
    Agrochemical, AgrochemicalCategory, CostSummary, EntryDetails, EntryField, EntryImage,
    EntryValidationError, TimelineEntry,
};
