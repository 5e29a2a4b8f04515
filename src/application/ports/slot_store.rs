use crate::shared::error::AppError;
use async_trait::async_trait;

/// Durable named text slots; the device's equivalent of browser local storage.
#[async_trait]
pub trait LocalSlotStore: Send + Sync {
    async fn read_slot(&self, slot: &str) -> Result<Option<String>, AppError>;
    async fn write_slot(&self, slot: &str, value: &str) -> Result<(), AppError>;
    async fn remove_slot(&self, slot: &str) -> Result<(), AppError>;
}
