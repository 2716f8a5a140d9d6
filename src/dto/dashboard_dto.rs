use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One past attempt, joined with quiz/chapter metadata.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttemptSummary {
    pub quiz_id: i64,
    pub chapter_name: String,
    pub total_scored: i64,
    pub total_questions: i64,
    pub attempted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SubjectAttemptCount {
    pub subject_id: i64,
    pub subject_name: String,
    pub attempts: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ChapterBestScore {
    pub chapter_id: i64,
    pub chapter_name: String,
    pub best_score: i64,
}

/// Per-month attempt counts in parallel arrays, ascending by month string,
/// the shape the dashboard chart consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyAttempts {
    pub months: Vec<String>,
    pub counts: Vec<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummaryResponse {
    pub monthly: MonthlyAttempts,
    pub subjects: Vec<SubjectAttemptCount>,
}
