/// The closed set of mood labels the assistant works with.
///
/// The remote classifier is constrained to this list; anything it returns
/// outside of it is downgraded to [`NEUTRAL`] before reaching scoring or
/// aggregation.
pub const MOOD_VOCABULARY: [&str; 20] = [
    "happy",
    "sad",
    "angry",
    "anxious",
    "confused",
    "hopeful",
    "grateful",
    "excited",
    "worried",
    "tired",
    "frustrated",
    "overwhelmed",
    "calm",
    "peaceful",
    "content",
    "neutral",
    "disappointed",
    "lonely",
    "proud",
    "stressed",
];

/// Fallback label for anything we cannot classify.
pub const NEUTRAL: &str = "neutral";

pub fn is_valid_mood(label: &str) -> bool {
    MOOD_VOCABULARY.contains(&label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_contains_neutral() {
        assert!(is_valid_mood(NEUTRAL));
    }

    #[test]
    fn test_rejects_out_of_vocabulary() {
        assert!(!is_valid_mood("ecstatic"));
        assert!(!is_valid_mood(""));
        assert!(!is_valid_mood("Happy"));
    }
}
