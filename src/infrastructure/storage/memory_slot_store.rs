use crate::application::ports::LocalSlotStore;
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Slot store that lives as long as the process. Used for `--ephemeral`
/// sessions and in tests, where [`set_unavailable`](Self::set_unavailable)
/// simulates a device with storage disabled.
#[derive(Default)]
pub struct MemorySlotStore {
    slots: RwLock<HashMap<String, String>>,
    unavailable: AtomicBool,
}

impl MemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::Storage("Local storage is unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl LocalSlotStore for MemorySlotStore {
    async fn read_slot(&self, slot: &str) -> Result<Option<String>, AppError> {
        self.check_available()?;
        Ok(self.slots.read().await.get(slot).cloned())
    }

    async fn write_slot(&self, slot: &str, value: &str) -> Result<(), AppError> {
        self.check_available()?;
        self.slots
            .write()
            .await
            .insert(slot.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_slot(&self, slot: &str) -> Result<(), AppError> {
        self.check_available()?;
        self.slots.write().await.remove(slot);
        Ok(())
    }
}
