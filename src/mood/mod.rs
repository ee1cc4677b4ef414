use async_trait::async_trait;

pub mod classify;
pub mod extract;
pub mod score;
pub mod timeparse;
pub mod trend;
pub mod vocabulary;

/// A mood-resolution capability: free text in, mood label out.
///
/// Two implementations exist and call sites pick one explicitly:
/// [`extract::KeywordResolver`] stays local and is used when re-deriving
/// moods over stored history, while [`classify::RemoteClassifier`] asks the
/// hosted model and is wired into the live diary flow.
#[async_trait]
pub trait MoodResolver: Send + Sync {
    async fn resolve(&self, text: &str) -> String;
}
