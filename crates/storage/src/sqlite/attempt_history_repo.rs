use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

use mcq_core::model::AttemptSummary;

use super::SqliteRepository;
use crate::repository::{AttemptHistoryRepository, HISTORY_CAP, StorageError};

/// Fixed slot key for the bounded attempt history.
const HISTORY_SLOT: &str = "attempt_history_v1";

impl SqliteRepository {
    async fn read_history(&self) -> Result<Vec<AttemptSummary>, StorageError> {
        let row = sqlx::query("SELECT value FROM slots WHERE key = ?1")
            .bind(HISTORY_SLOT)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };
        let raw: String = row
            .try_get("value")
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        // Unparseable history reads as empty rather than erroring; the next
        // append rewrites the slot with a clean list.
        Ok(serde_json::from_str(&raw).unwrap_or_default())
    }

    async fn write_history(&self, attempts: &[AttemptSummary]) -> Result<(), StorageError> {
        let payload = serde_json::to_string(attempts)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        sqlx::query(
            r"
                INSERT INTO slots (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
            ",
        )
        .bind(HISTORY_SLOT)
        .bind(payload)
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl AttemptHistoryRepository for SqliteRepository {
    async fn append(&self, attempt: &AttemptSummary) -> Result<(), StorageError> {
        let mut attempts = self.read_history().await?;
        attempts.insert(0, attempt.clone());
        attempts.truncate(HISTORY_CAP);
        self.write_history(&attempts).await
    }

    async fn load_all(&self) -> Result<Vec<AttemptSummary>, StorageError> {
        self.read_history().await
    }
}
