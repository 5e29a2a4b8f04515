use crate::application::ports::LocalSlotStore;
use crate::domain::entities::TimelineEntry;
use crate::shared::error::AppError;
use std::sync::Arc;

/// Copy of the rendered entry list, so a reload while offline still shows
/// what the user entered.
pub struct EntryCache {
    store: Arc<dyn LocalSlotStore>,
    slot: String,
}

impl EntryCache {
    pub fn new(store: Arc<dyn LocalSlotStore>, slot: impl Into<String>) -> Self {
        Self {
            store,
            slot: slot.into(),
        }
    }

    /// Empty when the slot is missing or unreadable.
    pub async fn load(&self) -> Vec<TimelineEntry> {
        match self.store.read_slot(&self.slot).await {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(slot = %self.slot, error = %e, "Entry cache is malformed, ignoring");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(slot = %self.slot, error = %e, "Entry cache unreadable, ignoring");
                Vec::new()
            }
        }
    }

    pub async fn save(&self, entries: &[TimelineEntry]) -> Result<(), AppError> {
        let raw = serde_json::to_string(entries)?;
        self.store.write_slot(&self.slot, &raw).await
    }
}
