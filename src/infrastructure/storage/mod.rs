pub mod memory_slot_store;
pub mod sqlite_slot_store;

pub use memory_slot_store::MemorySlotStore;
pub use sqlite_slot_store::SqliteSlotStore;
