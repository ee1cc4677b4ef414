use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::error::{AppError, AppResult};
use crate::models::diary_entry::{CreateDiaryEntryRequest, DiaryEntry, DiaryHistoryQuery};
use crate::services::diary::ProcessedEntry;
use crate::services::session::SessionMessage;
use crate::AppState;

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateDiaryEntryRequest>,
) -> AppResult<Json<ProcessedEntry>> {
    let entry_text = body.entry_text.trim();
    if entry_text.is_empty() {
        return Err(AppError::Validation("Diary entry must not be empty".into()));
    }

    let processed = state.diary.process_entry(auth_user.id, entry_text).await?;
    Ok(Json(processed))
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<DiaryHistoryQuery>,
) -> AppResult<Json<Vec<DiaryEntry>>> {
    let history = state.diary.store().get_history(auth_user.id).await?;

    // Per-user entry volume is small; filtering the full history in memory
    // keeps the store interface minimal.
    let entries: Vec<DiaryEntry> = history
        .into_iter()
        .filter(|entry| {
            let date = entry.created_at.date_naive();
            query.start_date.map_or(true, |start| date >= start)
                && query.end_date.map_or(true, |end| date <= end)
        })
        .collect();

    Ok(Json(entries))
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub messages: Vec<SessionMessage>,
}

pub async fn get_session(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<SessionResponse>> {
    let messages = state.diary.session_messages(auth_user.id).await?;
    Ok(Json(SessionResponse { messages }))
}
