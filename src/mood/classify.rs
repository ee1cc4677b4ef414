use std::sync::Arc;

use async_trait::async_trait;

use crate::mood::vocabulary::{is_valid_mood, MOOD_VOCABULARY, NEUTRAL};
use crate::mood::MoodResolver;
use crate::services::llm::{ChatMessage, LlmClient};

/// Remote-backed mood classification for live diary submissions.
///
/// The hosted model is asked for exactly one vocabulary word. An invalid
/// answer triggers at most one simplified retry; any remaining failure
/// (network error, timeout, out-of-vocabulary answer) downgrades to
/// "neutral". This path never surfaces an error to the caller.
pub struct RemoteClassifier {
    llm: Arc<dyn LlmClient>,
    max_retries: u32,
}

impl RemoteClassifier {
    pub fn new(llm: Arc<dyn LlmClient>, max_retries: u32) -> Self {
        // One retry is the ceiling: callers must not block on a flaky model.
        Self {
            llm,
            max_retries: max_retries.min(1),
        }
    }

    pub async fn classify(&self, text: &str) -> String {
        match self.llm.generate(&detection_prompt(text)).await {
            Ok(raw) => {
                let label = first_token(&raw);
                if is_valid_mood(&label) {
                    return label;
                }
                if self.max_retries == 0 {
                    tracing::warn!(answer = %label, "classifier answer out of vocabulary, no retry budget");
                    return NEUTRAL.to_string();
                }
                self.retry(text).await
            }
            Err(e) => {
                tracing::warn!(error = %e, "mood classification failed, defaulting to neutral");
                NEUTRAL.to_string()
            }
        }
    }

    async fn retry(&self, text: &str) -> String {
        match self.llm.generate(&retry_prompt(text)).await {
            Ok(raw) => {
                let label = first_token(&raw);
                if is_valid_mood(&label) {
                    label
                } else {
                    tracing::warn!(answer = %label, "classifier retry still out of vocabulary");
                    NEUTRAL.to_string()
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "classifier retry failed, defaulting to neutral");
                NEUTRAL.to_string()
            }
        }
    }
}

#[async_trait]
impl MoodResolver for RemoteClassifier {
    async fn resolve(&self, text: &str) -> String {
        self.classify(text).await
    }
}

/// Trim, lowercase, keep the first whitespace token, drop trailing
/// punctuation. Models love to answer "Happy." or "happy, because ...".
fn first_token(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .split_whitespace()
        .next()
        .unwrap_or("")
        .trim_end_matches(['.', ',', '!', '?', ';', ':'])
        .to_string()
}

fn detection_prompt(text: &str) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(
            "You are an emotion detection AI. Analyze the text and identify the SINGLE strongest emotion.\n\
             STRICTLY respond with ONLY ONE WORD from this list:\n\
             happy, sad, angry, anxious, confused, hopeful, grateful, excited, worried, tired, \
             frustrated, overwhelmed, calm, peaceful, content, neutral, disappointed, lonely, \
             proud, stressed\n\n\
             Examples:\n\
             \"I had a great day with friends\" -> happy\n\
             \"I'm so mad at my boss\" -> angry\n\
             \"Not sure what to do about this situation\" -> confused\n\
             \"Feeling really good about my progress\" -> proud\n\
             \"I feel completely drained\" -> tired\n\n\
             If no strong emotion is present, respond with 'neutral'.",
        ),
        ChatMessage::user(format!("Text to analyze: {text}")),
    ]
}

fn retry_prompt(text: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::user(format!(
        "Select one word emotion from {} for this text: {text}",
        MOOD_VOCABULARY.join(", ")
    ))]
}
