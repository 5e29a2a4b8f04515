use async_trait::async_trait;
use mockall::mock;

use nhatky_lib::application::ports::TimelineGateway;
use nhatky_lib::domain::entities::{EntryDetails, TimelineEntry};
use nhatky_lib::domain::value_objects::EntryId;
use nhatky_lib::shared::error::AppError;

mock! {
    pub TimelineGatewayPort {}

    #[async_trait]
    impl TimelineGateway for TimelineGatewayPort {
        async fn list_entries(&self, owner_id: &str) -> Result<Vec<TimelineEntry>, AppError>;
        async fn create_entry(
            &self,
            owner_id: &str,
            details: &EntryDetails,
        ) -> Result<TimelineEntry, AppError>;
        async fn update_entry(&self, entry: &TimelineEntry) -> Result<TimelineEntry, AppError>;
        async fn delete_entry(&self, id: &EntryId) -> Result<(), AppError>;
    }
}

pub type MockTimelineGateway = MockTimelineGatewayPort;
