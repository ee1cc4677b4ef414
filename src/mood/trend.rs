use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::Value;

use crate::mood::extract::extract_mood;
use crate::mood::score::{score_label, MoodBucket};
use crate::mood::timeparse;

/// Timestamp fields probed on a raw record, in priority order.
const TIMESTAMP_FIELDS: [&str; 4] = ["created_at", "timestamp", "date", "created"];

pub const DEFAULT_WINDOW_DAYS: i64 = 7;

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// One scored observation on the mood timeline. Derived on demand, never
/// persisted.
#[derive(Debug, Clone, Serialize)]
pub struct MoodPoint {
    pub timestamp: NaiveDateTime,
    pub mood: String,
    pub score: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Steady,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendSummary {
    pub dominant_mood: MoodBucket,
    pub trend: Trend,
    pub recent_entry_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeBucket {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeBucket {
    /// Morning [5,12), Afternoon [12,17), Evening [17,21), Night otherwise.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=11 => TimeBucket::Morning,
            12..=16 => TimeBucket::Afternoon,
            17..=20 => TimeBucket::Evening,
            _ => TimeBucket::Night,
        }
    }

    fn index(self) -> usize {
        match self {
            TimeBucket::Morning => 0,
            TimeBucket::Afternoon => 1,
            TimeBucket::Evening => 2,
            TimeBucket::Night => 3,
        }
    }
}

const TIME_BUCKETS: [TimeBucket; 4] = [
    TimeBucket::Morning,
    TimeBucket::Afternoon,
    TimeBucket::Evening,
    TimeBucket::Night,
];

/// Average mood score for one (day-of-week, time-of-day) cell. Cells with
/// no entries are simply absent from the output.
#[derive(Debug, Clone, Serialize)]
pub struct PatternCell {
    pub day: &'static str,
    pub time_of_day: TimeBucket,
    pub average_score: f64,
    pub entries: usize,
}

/// Entry count for one score level of the distribution chart.
#[derive(Debug, Clone, Serialize)]
pub struct DistributionSlice {
    pub score: i32,
    pub label: MoodBucket,
    pub count: usize,
}

/// Turn raw diary records into scored, time-ordered mood points.
///
/// Records with no usable timestamp are skipped — a malformed row must
/// never abort the whole batch.
pub fn prepare_mood_points(records: &[Value]) -> Vec<MoodPoint> {
    let mut points: Vec<MoodPoint> = records
        .iter()
        .filter_map(|record| {
            let raw_ts = TIMESTAMP_FIELDS.iter().find_map(|field| {
                record
                    .get(field)
                    .and_then(Value::as_str)
                    .filter(|s| !s.trim().is_empty())
            })?;
            let timestamp = timeparse::parse_flexible(raw_ts).ok()?;
            let mood = extract_mood(record);
            let score = score_label(&mood);
            Some(MoodPoint {
                timestamp,
                mood,
                score,
            })
        })
        .collect();
    points.sort_by_key(|p| p.timestamp);
    points
}

fn mean(points: &[&MoodPoint]) -> f64 {
    points.iter().map(|p| p.score as f64).sum::<f64>() / points.len() as f64
}

/// Dominant mood bucket and short-term trend over the trailing window.
///
/// The trend compares the first and second half of the windowed entries and
/// needs at least three of them; below that, any delta is noise and the
/// trend reports steady.
pub fn summarize(points: &[MoodPoint], window_days: i64, now: NaiveDateTime) -> TrendSummary {
    let cutoff = now - Duration::days(window_days);
    let recent: Vec<&MoodPoint> = points.iter().filter(|p| p.timestamp >= cutoff).collect();

    if recent.is_empty() {
        return TrendSummary {
            dominant_mood: MoodBucket::Neutral,
            trend: Trend::Steady,
            recent_entry_count: 0,
        };
    }

    let dominant_mood = MoodBucket::from_average(mean(&recent));

    let trend = if recent.len() >= 3 {
        let mid = recent.len() / 2;
        let first_half = mean(&recent[..mid]);
        let second_half = mean(&recent[mid..]);
        if second_half > first_half + 0.3 {
            Trend::Improving
        } else if second_half < first_half - 0.3 {
            Trend::Declining
        } else {
            Trend::Steady
        }
    } else {
        Trend::Steady
    };

    TrendSummary {
        dominant_mood,
        trend,
        recent_entry_count: recent.len(),
    }
}

/// Entry counts per score level across the full history, highest score
/// first. Levels with zero entries are omitted.
pub fn score_distribution(points: &[MoodPoint]) -> Vec<DistributionSlice> {
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for point in points {
        *counts.entry(point.score).or_default() += 1;
    }
    counts
        .into_iter()
        .rev()
        .map(|(score, count)| DistributionSlice {
            score,
            label: MoodBucket::from_score(score),
            count,
        })
        .collect()
}

/// Average score per (day-of-week, time-of-day) cell over the full history.
pub fn weekly_pattern(points: &[MoodPoint]) -> Vec<PatternCell> {
    let mut cells: BTreeMap<(u32, usize), (f64, usize)> = BTreeMap::new();
    for point in points {
        let day = point.timestamp.weekday().num_days_from_monday();
        let bucket = TimeBucket::from_hour(point.timestamp.hour());
        let cell = cells.entry((day, bucket.index())).or_insert((0.0, 0));
        cell.0 += point.score as f64;
        cell.1 += 1;
    }
    cells
        .into_iter()
        .map(|((day, bucket_idx), (sum, count))| PatternCell {
            day: DAY_NAMES[day as usize],
            time_of_day: TIME_BUCKETS[bucket_idx],
            average_score: sum / count as f64,
            entries: count,
        })
        .collect()
}

/// Mode over the full history. Intentionally a different lens than the
/// windowed dominant bucket; the two may disagree. Ties break toward the
/// alphabetically first label so the metric is deterministic.
pub fn most_common_mood(points: &[MoodPoint]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for point in points {
        *counts.entry(point.mood.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(a.0)))
        .map(|(mood, _)| mood.to_string())
}

/// Mean score over the full history, if there is any.
pub fn average_score(points: &[MoodPoint]) -> Option<f64> {
    if points.is_empty() {
        return None;
    }
    Some(points.iter().map(|p| p.score as f64).sum::<f64>() / points.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-06-15 12:00:00", "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn point(ts: &str, mood: &str) -> MoodPoint {
        MoodPoint {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            mood: mood.to_string(),
            score: score_label(mood),
        }
    }

    fn scored_point(ts: &str, score: i32) -> MoodPoint {
        MoodPoint {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            mood: "neutral".to_string(),
            score,
        }
    }

    #[test]
    fn test_empty_history_is_neutral_steady() {
        let summary = summarize(&[], DEFAULT_WINDOW_DAYS, now());
        assert_eq!(summary.dominant_mood, MoodBucket::Neutral);
        assert_eq!(summary.trend, Trend::Steady);
        assert_eq!(summary.recent_entry_count, 0);
    }

    #[test]
    fn test_two_entries_are_always_steady() {
        let points = vec![
            scored_point("2024-06-14 09:00:00", 2),
            scored_point("2024-06-14 21:00:00", 2),
        ];
        let summary = summarize(&points, DEFAULT_WINDOW_DAYS, now());
        assert_eq!(summary.trend, Trend::Steady);
        assert_eq!(summary.recent_entry_count, 2);
    }

    #[test]
    fn test_half_split_detects_improvement() {
        let points = vec![
            scored_point("2024-06-10 08:00:00", 1),
            scored_point("2024-06-11 08:00:00", 1),
            scored_point("2024-06-12 08:00:00", 1),
            scored_point("2024-06-13 08:00:00", 5),
            scored_point("2024-06-14 08:00:00", 5),
            scored_point("2024-06-15 08:00:00", 5),
        ];
        let summary = summarize(&points, DEFAULT_WINDOW_DAYS, now());
        assert_eq!(summary.trend, Trend::Improving);
    }

    #[test]
    fn test_half_split_detects_decline() {
        let points = vec![
            scored_point("2024-06-12 08:00:00", 5),
            scored_point("2024-06-13 08:00:00", 4),
            scored_point("2024-06-14 08:00:00", 1),
        ];
        let summary = summarize(&points, DEFAULT_WINDOW_DAYS, now());
        assert_eq!(summary.trend, Trend::Declining);
    }

    #[test]
    fn test_small_delta_stays_steady() {
        let points = vec![
            scored_point("2024-06-12 08:00:00", 3),
            scored_point("2024-06-13 08:00:00", 3),
            scored_point("2024-06-14 08:00:00", 3),
            scored_point("2024-06-15 08:00:00", 3),
        ];
        let summary = summarize(&points, DEFAULT_WINDOW_DAYS, now());
        assert_eq!(summary.trend, Trend::Steady);
    }

    #[test]
    fn test_dominant_bucket_boundaries() {
        // Average 4.6 over the window.
        let points = vec![
            scored_point("2024-06-13 08:00:00", 5),
            scored_point("2024-06-13 12:00:00", 5),
            scored_point("2024-06-13 16:00:00", 4),
            scored_point("2024-06-14 08:00:00", 5),
            scored_point("2024-06-14 12:00:00", 4),
        ];
        let summary = summarize(&points, DEFAULT_WINDOW_DAYS, now());
        assert_eq!(summary.dominant_mood, MoodBucket::VeryPositive);

        // Average exactly 2.5: inclusive upward into Neutral.
        let points = vec![
            scored_point("2024-06-14 08:00:00", 2),
            scored_point("2024-06-14 12:00:00", 3),
        ];
        let summary = summarize(&points, DEFAULT_WINDOW_DAYS, now());
        assert_eq!(summary.dominant_mood, MoodBucket::Neutral);
    }

    #[test]
    fn test_entries_outside_window_are_ignored() {
        let points = vec![
            scored_point("2024-05-01 08:00:00", 1),
            scored_point("2024-06-14 08:00:00", 4),
        ];
        let summary = summarize(&points, DEFAULT_WINDOW_DAYS, now());
        assert_eq!(summary.recent_entry_count, 1);
        assert_eq!(summary.dominant_mood, MoodBucket::Positive);
    }

    #[test]
    fn test_prepare_skips_unparsable_and_sorts() {
        let records = vec![
            json!({ "created_at": "2024-06-02T10:00:00", "mood": "happy" }),
            json!({ "created_at": "not a timestamp", "mood": "sad" }),
            json!({ "created_at": "2024-06-01T10:00:00", "mood": "tired" }),
            json!({ "entry": "no timestamp at all" }),
        ];
        let points = prepare_mood_points(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].mood, "tired");
        assert_eq!(points[1].mood, "happy");
    }

    #[test]
    fn test_prepare_falls_back_through_timestamp_fields() {
        let records = vec![json!({ "timestamp": "2024-06-01 09:30:00", "entry": "grateful for today" })];
        let points = prepare_mood_points(&records);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].mood, "grateful");
        assert_eq!(points[0].score, 4);
    }

    #[test]
    fn test_distribution_omits_empty_levels() {
        let points = vec![
            scored_point("2024-06-01 08:00:00", 5),
            scored_point("2024-06-02 08:00:00", 5),
            scored_point("2024-06-03 08:00:00", 1),
        ];
        let distribution = score_distribution(&points);
        assert_eq!(distribution.len(), 2);
        assert_eq!(distribution[0].score, 5);
        assert_eq!(distribution[0].count, 2);
        assert_eq!(distribution[0].label, MoodBucket::VeryPositive);
        assert_eq!(distribution[1].score, 1);
        assert_eq!(distribution[1].count, 1);
    }

    #[test]
    fn test_time_bucket_boundaries() {
        assert_eq!(TimeBucket::from_hour(4), TimeBucket::Night);
        assert_eq!(TimeBucket::from_hour(5), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(11), TimeBucket::Morning);
        assert_eq!(TimeBucket::from_hour(12), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::from_hour(16), TimeBucket::Afternoon);
        assert_eq!(TimeBucket::from_hour(17), TimeBucket::Evening);
        assert_eq!(TimeBucket::from_hour(20), TimeBucket::Evening);
        assert_eq!(TimeBucket::from_hour(21), TimeBucket::Night);
    }

    #[test]
    fn test_weekly_pattern_averages_cells_and_skips_missing() {
        // 2024-06-10 is a Monday.
        let points = vec![
            scored_point("2024-06-10 09:00:00", 4),
            scored_point("2024-06-10 10:00:00", 2),
            scored_point("2024-06-11 22:00:00", 5),
        ];
        let cells = weekly_pattern(&points);
        assert_eq!(cells.len(), 2);

        let monday_morning = &cells[0];
        assert_eq!(monday_morning.day, "Monday");
        assert_eq!(monday_morning.time_of_day, TimeBucket::Morning);
        assert!((monday_morning.average_score - 3.0).abs() < f64::EPSILON);
        assert_eq!(monday_morning.entries, 2);

        let tuesday_night = &cells[1];
        assert_eq!(tuesday_night.day, "Tuesday");
        assert_eq!(tuesday_night.time_of_day, TimeBucket::Night);
        assert_eq!(tuesday_night.entries, 1);
    }

    #[test]
    fn test_most_common_mood_is_mode_with_stable_ties() {
        let points = vec![
            point("2024-06-01 08:00:00", "happy"),
            point("2024-06-02 08:00:00", "happy"),
            point("2024-06-03 08:00:00", "sad"),
        ];
        assert_eq!(most_common_mood(&points), Some("happy".to_string()));

        let tied = vec![
            point("2024-06-01 08:00:00", "sad"),
            point("2024-06-02 08:00:00", "happy"),
        ];
        assert_eq!(most_common_mood(&tied), Some("happy".to_string()));

        assert_eq!(most_common_mood(&[]), None);
    }

    #[test]
    fn test_average_score() {
        let points = vec![
            scored_point("2024-06-01 08:00:00", 2),
            scored_point("2024-06-02 08:00:00", 4),
        ];
        assert_eq!(average_score(&points), Some(3.0));
        assert_eq!(average_score(&[]), None);
    }
}
