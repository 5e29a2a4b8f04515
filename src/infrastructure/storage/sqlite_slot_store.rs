use crate::application::ports::LocalSlotStore;
use crate::infrastructure::database::ConnectionPool;
use crate::shared::error::AppError;
use async_trait::async_trait;
use sqlx::Row;

/// Slots persisted in the `local_slots` table.
pub struct SqliteSlotStore {
    pool: ConnectionPool,
}

impl SqliteSlotStore {
    pub fn new(pool: ConnectionPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocalSlotStore for SqliteSlotStore {
    async fn read_slot(&self, slot: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM local_slots WHERE slot = ?")
            .bind(slot)
            .fetch_optional(self.pool.get_pool())
            .await?;

        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    async fn write_slot(&self, slot: &str, value: &str) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO local_slots (slot, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(slot) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(slot)
        .bind(value)
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(self.pool.get_pool())
        .await?;

        tracing::trace!(slot, bytes = value.len(), "Slot written");
        Ok(())
    }

    async fn remove_slot(&self, slot: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM local_slots WHERE slot = ?")
            .bind(slot)
            .execute(self.pool.get_pool())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> SqliteSlotStore {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.migrate().await.unwrap();
        SqliteSlotStore::new(pool)
    }

    #[tokio::test]
    async fn missing_slot_reads_none() {
        let store = setup().await;
        assert_eq!(store.read_slot("pending_changes").await.unwrap(), None);
    }

    #[tokio::test]
    async fn write_overwrites_previous_value() {
        let store = setup().await;
        store.write_slot("pending_changes", "[]").await.unwrap();
        store
            .write_slot("pending_changes", "[{\"kind\":\"delete\",\"payload\":\"1\"}]")
            .await
            .unwrap();

        assert_eq!(
            store.read_slot("pending_changes").await.unwrap().as_deref(),
            Some("[{\"kind\":\"delete\",\"payload\":\"1\"}]")
        );
    }

    #[tokio::test]
    async fn slots_are_independent_and_removable() {
        let store = setup().await;
        store.write_slot("timeline_entries", "[]").await.unwrap();
        store.write_slot("pending_changes", "[1]").await.unwrap();

        store.remove_slot("pending_changes").await.unwrap();
        assert_eq!(store.read_slot("pending_changes").await.unwrap(), None);
        assert_eq!(
            store.read_slot("timeline_entries").await.unwrap().as_deref(),
            Some("[]")
        );
    }
}
