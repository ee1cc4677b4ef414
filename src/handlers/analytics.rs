use axum::{extract::State, Extension, Json};
use chrono::{Datelike, Duration, Utc};
use serde::Serialize;

use crate::auth::middleware::AuthUser;
use crate::error::AppResult;
use crate::mood::trend::{
    self, DistributionSlice, MoodPoint, PatternCell, TrendSummary, DAY_NAMES,
};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct MoodSummaryResponse {
    #[serde(flatten)]
    pub summary: TrendSummary,
    /// Last few points for the dashboard mini chart.
    pub recent_points: Vec<MoodPoint>,
}

/// Dashboard widget: dominant bucket and trend over the trailing window.
pub async fn get_mood_summary(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MoodSummaryResponse>> {
    let history = state.diary.store().get_history(auth_user.id).await?;
    let records: Vec<serde_json::Value> =
        history.iter().map(|entry| entry.analysis_record()).collect();
    let points = trend::prepare_mood_points(&records);

    let summary = trend::summarize(&points, state.config.mood_window_days, Utc::now().naive_utc());
    let recent_points: Vec<MoodPoint> = points.iter().rev().take(10).rev().cloned().collect();

    Ok(Json(MoodSummaryResponse {
        summary,
        recent_points,
    }))
}

#[derive(Debug, Serialize)]
pub struct MoodAnalyticsResponse {
    pub average_mood: Option<f64>,
    /// Mode over all history — intentionally a different metric than the
    /// windowed dominant bucket; the two may disagree.
    pub most_common_mood: Option<String>,
    pub total_entries: usize,
    pub entries_this_week: usize,
    pub summary: TrendSummary,
    pub timeline: Vec<MoodPoint>,
    pub distribution: Vec<DistributionSlice>,
    pub weekly_pattern: Vec<PatternCell>,
    pub insights: Vec<String>,
}

/// Full analytics view: timeline, distribution, weekly pattern, insights.
pub async fn get_mood_analytics(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MoodAnalyticsResponse>> {
    let history = state.diary.store().get_history(auth_user.id).await?;
    let records: Vec<serde_json::Value> =
        history.iter().map(|entry| entry.analysis_record()).collect();
    let points = trend::prepare_mood_points(&records);

    let now = Utc::now().naive_utc();
    let summary = trend::summarize(&points, state.config.mood_window_days, now);
    let week_cutoff = now - Duration::days(7);
    let entries_this_week = points.iter().filter(|p| p.timestamp >= week_cutoff).count();

    Ok(Json(MoodAnalyticsResponse {
        average_mood: trend::average_score(&points),
        most_common_mood: trend::most_common_mood(&points),
        total_entries: points.len(),
        entries_this_week,
        summary,
        distribution: trend::score_distribution(&points),
        weekly_pattern: trend::weekly_pattern(&points),
        insights: build_insights(&points),
        timeline: points,
    }))
}

/// Deterministic insight sentences for the analytics page.
fn build_insights(points: &[MoodPoint]) -> Vec<String> {
    let mut insights = Vec::new();
    let Some(avg) = trend::average_score(points) else {
        return insights;
    };

    if avg >= 4.0 {
        insights.push("Great job maintaining positive mental health! Keep up the good work.".into());
    } else if avg >= 3.0 {
        insights.push("You're doing well overall. Consider what activities make you happiest.".into());
    } else {
        insights.push(
            "Remember that it's okay to have ups and downs. Consider talking to someone you trust."
                .into(),
        );
    }

    if let Some(best_day) = best_day_of_week(points) {
        insights.push(format!("Your happiest day tends to be {best_day}."));
    }

    // Compare the last five entries against the earliest sample; shifts
    // smaller than half a point are not worth surfacing.
    if points.len() >= 5 {
        let recent_avg = points[points.len() - 5..]
            .iter()
            .map(|p| p.score as f64)
            .sum::<f64>()
            / 5.0;
        let older_avg = if points.len() >= 10 {
            points[..5].iter().map(|p| p.score as f64).sum::<f64>() / 5.0
        } else {
            points[0].score as f64
        };

        if recent_avg > older_avg + 0.5 {
            insights.push("Your mood has been improving recently - that's wonderful!".into());
        } else if recent_avg < older_avg - 0.5 {
            insights.push("Your mood has been lower recently. Consider self-care activities.".into());
        }
    }

    insights
}

/// Weekday with the highest mean score, if any entries exist.
fn best_day_of_week(points: &[MoodPoint]) -> Option<&'static str> {
    let mut sums = [(0.0f64, 0usize); 7];
    for point in points {
        let idx = point.timestamp.weekday().num_days_from_monday() as usize;
        sums[idx].0 += point.score as f64;
        sums[idx].1 += 1;
    }

    sums.iter()
        .enumerate()
        .filter(|(_, (_, count))| *count > 0)
        .map(|(i, (sum, count))| (i, sum / *count as f64))
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| DAY_NAMES[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn point(ts: &str, score: i32) -> MoodPoint {
        MoodPoint {
            timestamp: NaiveDateTime::parse_from_str(ts, "%Y-%m-%d %H:%M:%S").unwrap(),
            mood: "neutral".into(),
            score,
        }
    }

    #[test]
    fn test_insights_empty_history() {
        assert!(build_insights(&[]).is_empty());
    }

    #[test]
    fn test_insights_overall_average_message() {
        let high = vec![point("2024-06-10 09:00:00", 5), point("2024-06-11 09:00:00", 4)];
        assert!(build_insights(&high)[0].starts_with("Great job"));

        let low = vec![point("2024-06-10 09:00:00", 1), point("2024-06-11 09:00:00", 2)];
        assert!(build_insights(&low)[0].starts_with("Remember"));
    }

    #[test]
    fn test_insights_detect_recent_improvement() {
        // Ten points: five low then five high.
        let mut points = Vec::new();
        for day in 1..=5 {
            points.push(point(&format!("2024-06-0{day} 09:00:00"), 1));
        }
        for day in 6..=9 {
            points.push(point(&format!("2024-06-0{day} 09:00:00"), 5));
        }
        points.push(point("2024-06-10 09:00:00", 5));

        let insights = build_insights(&points);
        assert!(insights.iter().any(|s| s.contains("improving recently")));
    }

    #[test]
    fn test_best_day_of_week() {
        // 2024-06-10 is a Monday, 2024-06-11 a Tuesday.
        let points = vec![
            point("2024-06-10 09:00:00", 2),
            point("2024-06-11 09:00:00", 5),
        ];
        assert_eq!(best_day_of_week(&points), Some("Tuesday"));
        assert_eq!(best_day_of_week(&[]), None);
    }
}
