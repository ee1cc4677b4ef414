use serde::{Deserialize, Serialize};

/// Map a mood label to its ordinal intensity on the 1–5 scale.
///
/// The table covers the classifier vocabulary plus the wider set of words
/// the keyword extractor and older stored entries can produce. Unknown
/// labels score 3: the function is total over arbitrary strings, so nothing
/// upstream can make aggregation fail.
pub fn score_label(label: &str) -> i32 {
    match label.trim().to_lowercase().as_str() {
        // Very positive
        "excited" | "thrilled" | "ecstatic" | "elated" | "joyful" | "euphoric" => 5,

        // Positive
        "happy" | "cheerful" | "delighted" | "glad" | "content" | "grateful" | "thankful"
        | "blessed" | "peaceful" | "proud" => 4,

        // Neutral / calm
        "calm" | "neutral" | "relaxed" | "tranquil" | "composed" | "reflective" | "thoughtful"
        | "okay" | "fine" => 3,

        // Mildly negative
        "confused" | "uncertain" | "worried" | "concerned" | "uneasy" | "tired" | "weary"
        | "drained" | "restless" | "bored" => 2,

        // Negative
        "anxious" | "stressed" | "overwhelmed" | "sad" | "down" | "angry" | "frustrated"
        | "annoyed" | "lonely" | "isolated" | "disappointed" | "discouraged" | "depressed"
        | "furious" => 1,

        _ => 3,
    }
}

/// Coarse five-way sentiment category derived from mean scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoodBucket {
    #[serde(rename = "very positive")]
    VeryPositive,
    #[serde(rename = "positive")]
    Positive,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "negative")]
    Negative,
    #[serde(rename = "very negative")]
    VeryNegative,
}

impl MoodBucket {
    /// Thresholds are inclusive upward: an average of exactly 2.5 lands in
    /// `Neutral`, exactly 4.5 in `VeryPositive`.
    pub fn from_average(avg: f64) -> Self {
        if avg >= 4.5 {
            MoodBucket::VeryPositive
        } else if avg >= 3.5 {
            MoodBucket::Positive
        } else if avg >= 2.5 {
            MoodBucket::Neutral
        } else if avg >= 1.5 {
            MoodBucket::Negative
        } else {
            MoodBucket::VeryNegative
        }
    }

    pub fn from_score(score: i32) -> Self {
        match score {
            5 => MoodBucket::VeryPositive,
            4 => MoodBucket::Positive,
            3 => MoodBucket::Neutral,
            2 => MoodBucket::Negative,
            _ => MoodBucket::VeryNegative,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MoodBucket::VeryPositive => "very positive",
            MoodBucket::Positive => "positive",
            MoodBucket::Neutral => "neutral",
            MoodBucket::Negative => "negative",
            MoodBucket::VeryNegative => "very negative",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mood::vocabulary::MOOD_VOCABULARY;

    #[test]
    fn test_scoring_is_total_over_vocabulary() {
        for label in MOOD_VOCABULARY {
            let score = score_label(label);
            assert!((1..=5).contains(&score), "{label} scored {score}");
        }
    }

    #[test]
    fn test_documented_table_values() {
        assert_eq!(score_label("excited"), 5);
        assert_eq!(score_label("happy"), 4);
        assert_eq!(score_label("proud"), 4);
        assert_eq!(score_label("calm"), 3);
        assert_eq!(score_label("tired"), 2);
        assert_eq!(score_label("confused"), 2);
        assert_eq!(score_label("anxious"), 1);
        assert_eq!(score_label("depressed"), 1);
    }

    #[test]
    fn test_unknown_labels_score_neutral() {
        assert_eq!(score_label("flabbergasted"), 3);
        assert_eq!(score_label(""), 3);
        // In-vocabulary but outside the valence table.
        assert_eq!(score_label("hopeful"), 3);
    }

    #[test]
    fn test_scoring_normalizes_case_and_whitespace() {
        assert_eq!(score_label("  Happy "), 4);
        assert_eq!(score_label("ANXIOUS"), 1);
    }

    #[test]
    fn test_bucket_thresholds_inclusive_upward() {
        assert_eq!(MoodBucket::from_average(4.6), MoodBucket::VeryPositive);
        assert_eq!(MoodBucket::from_average(4.5), MoodBucket::VeryPositive);
        assert_eq!(MoodBucket::from_average(4.49), MoodBucket::Positive);
        assert_eq!(MoodBucket::from_average(2.5), MoodBucket::Neutral);
        assert_eq!(MoodBucket::from_average(2.49), MoodBucket::Negative);
        assert_eq!(MoodBucket::from_average(1.0), MoodBucket::VeryNegative);
    }

    #[test]
    fn test_bucket_from_score() {
        assert_eq!(MoodBucket::from_score(5), MoodBucket::VeryPositive);
        assert_eq!(MoodBucket::from_score(3), MoodBucket::Neutral);
        assert_eq!(MoodBucket::from_score(1), MoodBucket::VeryNegative);
    }
}
