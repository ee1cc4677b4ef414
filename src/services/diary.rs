use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::diary_entry::DiaryEntry;
use crate::mood::MoodResolver;
use crate::services::llm::{ChatMessage, LlmClient, LlmError};
use crate::services::session::{SessionMessage, SessionStore};
use crate::services::store::{DiaryStore, NewDiaryEntry, StoreError};

/// How many prior exchanges are fed back to the reply model as context.
const CONTEXT_ENTRIES: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum DiaryError {
    #[error("reply generation failed: {0}")]
    Generation(#[source] LlmError),

    #[error("diary history unavailable: {0}")]
    History(#[from] StoreError),
}

impl From<DiaryError> for AppError {
    fn from(e: DiaryError) -> Self {
        match e {
            DiaryError::Generation(src) => AppError::Generation(src.to_string()),
            DiaryError::History(src) => src.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedEntry {
    pub response_text: String,
    pub mood: String,
    /// False when the entry could not be persisted. The session view is
    /// still updated so the user sees their exchange.
    pub saved: bool,
}

/// Orchestrates one diary submission: context fetch, concurrent reply
/// generation and mood classification, persistence, session update.
#[derive(Clone)]
pub struct DiaryService {
    store: Arc<dyn DiaryStore>,
    chat: Arc<dyn LlmClient>,
    classifier: Arc<dyn MoodResolver>,
    sessions: SessionStore,
}

impl DiaryService {
    pub fn new(
        store: Arc<dyn DiaryStore>,
        chat: Arc<dyn LlmClient>,
        classifier: Arc<dyn MoodResolver>,
        sessions: SessionStore,
    ) -> Self {
        Self {
            store,
            chat,
            classifier,
            sessions,
        }
    }

    pub fn store(&self) -> &Arc<dyn DiaryStore> {
        &self.store
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub async fn process_entry(
        &self,
        user_id: Uuid,
        entry_text: &str,
    ) -> Result<ProcessedEntry, DiaryError> {
        // A history fetch failure must not block the reply; fall back to an
        // empty context.
        let history = match self.store.get_history(user_id).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(error = %e, %user_id, "history fetch failed, replying without context");
                Vec::new()
            }
        };
        let context = conversation_context(&history, CONTEXT_ENTRIES);

        // Reply and classification are independent: run them concurrently,
        // persist only after both are in.
        let prompt = reply_prompt(&context, entry_text);
        let (reply, mood) = tokio::join!(
            self.chat.generate(&prompt),
            self.classifier.resolve(entry_text),
        );
        let response_text = reply.map_err(DiaryError::Generation)?;

        let raw_payload = serde_json::json!({
            "entry": entry_text,
            "response": response_text,
            "mood": mood,
            "timestamp": Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        });

        let saved = match self
            .store
            .save_entry(
                user_id,
                NewDiaryEntry {
                    entry_text: entry_text.to_string(),
                    response_text: response_text.clone(),
                    mood: mood.clone(),
                    raw_payload,
                },
            )
            .await
        {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, %user_id, "failed to persist diary entry");
                false
            }
        };

        self.sessions
            .append_exchange(user_id, entry_text, &response_text)
            .await;

        Ok(ProcessedEntry {
            response_text,
            mood,
            saved,
        })
    }

    /// The session transcript, hydrated from persisted history on first
    /// access so a returning user sees their previous exchanges.
    pub async fn session_messages(&self, user_id: Uuid) -> Result<Vec<SessionMessage>, DiaryError> {
        if let Some(messages) = self.sessions.messages(user_id).await {
            return Ok(messages);
        }

        let history = self.store.get_history(user_id).await?;
        let messages: Vec<SessionMessage> = history
            .iter()
            .flat_map(|entry| {
                [
                    SessionMessage::user(&entry.entry_text),
                    SessionMessage::assistant(&entry.response_text),
                ]
            })
            .collect();

        self.sessions.replace(user_id, messages.clone()).await;
        Ok(messages)
    }

    pub async fn end_session(&self, user_id: Uuid) {
        self.sessions.discard(user_id).await;
    }
}

fn conversation_context(history: &[DiaryEntry], max_entries: usize) -> String {
    if history.is_empty() {
        return "No previous context".to_string();
    }

    let skip = history.len().saturating_sub(max_entries);
    let mut context = String::new();
    for entry in &history[skip..] {
        context.push_str(&format!(
            "User entry: {}\nAssistant response: {}\n\n",
            entry.entry_text, entry.response_text
        ));
    }
    context
}

fn reply_prompt(context: &str, entry: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(
            "You are an empathetic listener and emotional support AI. Your goal is to help the \
             user process their emotions by providing supportive, non-judgmental responses. \
             Acknowledge their feelings, offer gentle insights, and suggest healthy coping \
             mechanisms when appropriate. Keep your responses warm and conversational. Try to \
             identify the user's emotional state from their entry.",
        ),
        ChatMessage::user(format!(
            "Previous conversation context: {context}. Diary entry: {entry}"
        )),
    ]
}
