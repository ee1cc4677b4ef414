use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::diary_entry::DiaryEntry;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Database(e) => AppError::Database(e),
            StoreError::Unavailable(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Fields persisted for one diary submission. `raw_payload` is the lossless
/// JSON snapshot of {entry, response, mood, timestamp} kept for replay.
#[derive(Debug, Clone)]
pub struct NewDiaryEntry {
    pub entry_text: String,
    pub response_text: String,
    pub mood: String,
    pub raw_payload: Value,
}

/// Persistence seam for diary entries. The production implementation is
/// Postgres; tests swap in an in-memory fake.
#[async_trait]
pub trait DiaryStore: Send + Sync {
    /// Full history for one user, oldest first.
    async fn get_history(&self, user_id: Uuid) -> Result<Vec<DiaryEntry>, StoreError>;

    async fn save_entry(&self, user_id: Uuid, entry: NewDiaryEntry)
        -> Result<DiaryEntry, StoreError>;
}

pub struct PgDiaryStore {
    pool: PgPool,
}

impl PgDiaryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DiaryStore for PgDiaryStore {
    async fn get_history(&self, user_id: Uuid) -> Result<Vec<DiaryEntry>, StoreError> {
        let entries = sqlx::query_as::<_, DiaryEntry>(
            r#"
            SELECT * FROM diary_entries
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }

    async fn save_entry(
        &self,
        user_id: Uuid,
        entry: NewDiaryEntry,
    ) -> Result<DiaryEntry, StoreError> {
        let saved = sqlx::query_as::<_, DiaryEntry>(
            r#"
            INSERT INTO diary_entries (id, user_id, entry_text, response_text, mood, raw_payload)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&entry.entry_text)
        .bind(&entry.response_text)
        .bind(&entry.mood)
        .bind(&entry.raw_payload)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }
}
