use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::mood::vocabulary::NEUTRAL;
use crate::mood::MoodResolver;

/// Keyword patterns, most specific first: "excited" outranks the generic
/// "happy" so "thrilled but happy" resolves to excited.
static KEYWORD_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("excited", r"\b(excited|thrilled|ecstatic|elated)\b"),
        ("happy", r"\b(happy|joyful|cheerful|delighted|glad|great)\b"),
        ("grateful", r"\b(grateful|thankful|blessed|appreciative)\b"),
        ("content", r"\b(content|satisfied|peaceful|serene)\b"),
        ("calm", r"\b(calm|relaxed|tranquil|composed)\b"),
        ("anxious", r"\b(anxious|nervous|worried|concerned|uneasy)\b"),
        ("stressed", r"\b(stressed|overwhelmed|pressured|tense)\b"),
        ("sad", r"\b(sad|down|depressed|gloomy|melancholy)\b"),
        ("angry", r"\b(angry|mad|furious|irritated|annoyed)\b"),
        ("frustrated", r"\b(frustrated|annoyed|irritated|fed up)\b"),
        ("tired", r"\b(tired|exhausted|weary|drained|fatigue)\b"),
        ("confused", r"\b(confused|uncertain|puzzled|lost|unsure|not sure)\b"),
        ("lonely", r"\b(lonely|isolated|alone|disconnected)\b"),
        ("disappointed", r"\b(disappointed|let down|discouraged)\b"),
    ]
    .into_iter()
    .map(|(label, pattern)| (label, Regex::new(pattern).expect("static pattern")))
    .collect()
});

/// Free-text fields scanned for mood keywords, in priority order.
const TEXT_FIELDS: [&str; 4] = ["entry", "content", "text", "description"];

/// Pull a usable lowercase string out of a JSON field. Rejects empty values
/// and the literal "none" that older clients wrote for absent moods.
fn field_string(record: &Value, field: &str) -> Option<String> {
    let value = record.get(field)?;
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Null => return None,
        other => other.to_string(),
    };
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() || normalized == "none" {
        None
    } else {
        Some(normalized)
    }
}

/// Label of the first keyword pattern matching anywhere in the text.
pub fn keyword_mood(text: &str) -> Option<&'static str> {
    let text = text.to_lowercase();
    KEYWORD_PATTERNS
        .iter()
        .find(|(_, pattern)| pattern.is_match(&text))
        .map(|(label, _)| *label)
}

/// Derive a mood label from a stored diary record without a remote call.
///
/// Resolution order: explicit `mood` field, then `emotions`, then a keyword
/// scan of the first non-empty free-text field, then "neutral". Always
/// returns a non-empty label. Explicit fields pass through un-validated;
/// the scorer neutralizes anything unknown downstream.
pub fn extract_mood(record: &Value) -> String {
    if let Some(mood) = field_string(record, "mood") {
        return mood;
    }
    if let Some(emotions) = field_string(record, "emotions") {
        return emotions;
    }
    for field in TEXT_FIELDS {
        if let Some(text) = field_string(record, field) {
            return keyword_mood(&text).unwrap_or(NEUTRAL).to_string();
        }
    }
    NEUTRAL.to_string()
}

/// Local resolver for batch re-derivation over stored history. Pure and
/// deterministic; never touches the network.
pub struct KeywordResolver;

#[async_trait]
impl MoodResolver for KeywordResolver {
    async fn resolve(&self, text: &str) -> String {
        keyword_mood(text).unwrap_or(NEUTRAL).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_explicit_mood_field_wins_over_text() {
        let record = json!({ "mood": "Proud", "entry": "I feel so sad today" });
        assert_eq!(extract_mood(&record), "proud");
    }

    #[test]
    fn test_literal_none_is_ignored() {
        let record = json!({ "mood": "none", "entry": "feeling anxious about tomorrow" });
        assert_eq!(extract_mood(&record), "anxious");
    }

    #[test]
    fn test_emotions_field_is_second_choice() {
        let record = json!({ "mood": "", "emotions": "Grateful " });
        assert_eq!(extract_mood(&record), "grateful");
    }

    #[test]
    fn test_keyword_fallback_from_entry_text() {
        let record = json!({ "entry": "I had a great day with friends" });
        assert_eq!(extract_mood(&record), "happy");

        let record = json!({ "entry": "Not sure what to do" });
        assert_eq!(extract_mood(&record), "confused");
    }

    #[test]
    fn test_specific_patterns_beat_generic_ones() {
        assert_eq!(keyword_mood("so thrilled and happy today"), Some("excited"));
        assert_eq!(keyword_mood("completely DRAINED after work"), Some("tired"));
    }

    #[test]
    fn test_text_field_priority_order() {
        let record = json!({ "content": "feeling lonely", "description": "so happy" });
        assert_eq!(extract_mood(&record), "lonely");
    }

    #[test]
    fn test_defaults_to_neutral() {
        assert_eq!(extract_mood(&json!({})), "neutral");
        assert_eq!(extract_mood(&json!({ "entry": "went to the store" })), "neutral");
    }

    #[test]
    fn test_never_returns_empty() {
        let records = [
            json!({ "mood": null }),
            json!({ "entry": "" }),
            json!({ "mood": "  ", "emotions": "None" }),
        ];
        for record in records {
            assert!(!extract_mood(&record).is_empty());
        }
    }

    #[tokio::test]
    async fn test_keyword_resolver_matches_extractor() {
        let resolver = KeywordResolver;
        assert_eq!(resolver.resolve("I had a great day with friends").await, "happy");
        assert_eq!(resolver.resolve("nothing noteworthy").await, "neutral");
    }
}
