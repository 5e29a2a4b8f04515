use crate::domain::entities::{EntryDetails, TimelineEntry};
use crate::domain::value_objects::EntryId;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Remote timeline API (`/api/nhat-ky`).
#[async_trait]
pub trait TimelineGateway: Send + Sync {
    async fn list_entries(&self, owner_id: &str) -> Result<Vec<TimelineEntry>, AppError>;
    async fn create_entry(
        &self,
        owner_id: &str,
        details: &EntryDetails,
    ) -> Result<TimelineEntry, AppError>;
    async fn update_entry(&self, entry: &TimelineEntry) -> Result<TimelineEntry, AppError>;
    async fn delete_entry(&self, id: &EntryId) -> Result<(), AppError>;
}
