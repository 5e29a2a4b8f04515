pub mod entities;
pub mod value_objects;

pub use entities::{EntryDetails, EntryFilter, EntryStore, PendingChange, TimelineEntry};
pub use value_objects::{EntryId, PerformedDate};
