use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One persisted diary exchange. Rows are write-once; every analytics view
/// is re-derived from them on demand.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DiaryEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_text: String,
    pub response_text: String,
    pub mood: String,
    /// Lossless snapshot of {entry, response, mood, timestamp} captured at
    /// write time, kept for forward-compatible replay.
    pub raw_payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl DiaryEntry {
    /// Record view for the mood pipeline: the raw snapshot when present,
    /// otherwise the row itself.
    pub fn analysis_record(&self) -> serde_json::Value {
        match &self.raw_payload {
            serde_json::Value::Object(map) if !map.is_empty() => self.raw_payload.clone(),
            _ => serde_json::to_value(self).unwrap_or(serde_json::Value::Null),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDiaryEntryRequest {
    pub entry_text: String,
}

#[derive(Debug, Deserialize)]
pub struct DiaryHistoryQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}
