pub mod entry_id;
pub mod performed_date;

pub use entry_id::{EntryId, LOCAL_ID_PREFIX};
pub use performed_date::PerformedDate;
