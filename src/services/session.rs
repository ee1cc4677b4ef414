use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionMessage {
    pub role: SessionRole,
    pub content: String,
}

impl SessionMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: SessionRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: SessionRole::Assistant,
            content: content.into(),
        }
    }
}

/// One user's in-memory diary transcript. Created on first diary
/// interaction, discarded at logout.
#[derive(Debug, Clone, Serialize)]
pub struct DiarySession {
    pub started_at: DateTime<Utc>,
    pub messages: Vec<SessionMessage>,
}

impl DiarySession {
    fn new() -> Self {
        Self {
            started_at: Utc::now(),
            messages: Vec::new(),
        }
    }
}

/// In-process map of live diary sessions, keyed by user id.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, DiarySession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one user/assistant exchange, creating the session if needed.
    pub async fn append_exchange(&self, user_id: Uuid, entry: &str, response: &str) {
        let mut sessions = self.inner.write().await;
        let session = sessions.entry(user_id).or_insert_with(DiarySession::new);
        session.messages.push(SessionMessage::user(entry));
        session.messages.push(SessionMessage::assistant(response));
    }

    /// Replace the transcript wholesale (used when hydrating from history).
    pub async fn replace(&self, user_id: Uuid, messages: Vec<SessionMessage>) {
        let mut sessions = self.inner.write().await;
        let session = sessions.entry(user_id).or_insert_with(DiarySession::new);
        session.messages = messages;
    }

    pub async fn messages(&self, user_id: Uuid) -> Option<Vec<SessionMessage>> {
        self.inner
            .read()
            .await
            .get(&user_id)
            .map(|session| session.messages.clone())
    }

    pub async fn discard(&self, user_id: Uuid) {
        self.inner.write().await.remove(&user_id);
    }
}
