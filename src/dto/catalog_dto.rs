use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSubjectPayload {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSubjectPayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateChapterPayload {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateChapterPayload {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuizPayload {
    pub chapter_id: i64,
    pub date_of_quiz: NaiveDate,
    #[validate(length(min = 1))]
    pub time_duration: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuizPayload {
    pub date_of_quiz: Option<NaiveDate>,
    pub time_duration: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionPayload {
    pub quiz_id: i64,
    #[validate(length(min = 1))]
    pub question_title: String,
    #[validate(length(min = 1))]
    pub question_statement: String,
    #[validate(length(min = 1))]
    pub option1: String,
    #[validate(length(min = 1))]
    pub option2: String,
    pub option3: Option<String>,
    pub option4: Option<String>,
    #[validate(length(min = 1))]
    pub correct_option: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateQuestionPayload {
    pub question_title: Option<String>,
    pub question_statement: Option<String>,
    pub option1: Option<String>,
    pub option2: Option<String>,
    pub option3: Option<String>,
    pub option4: Option<String>,
    pub correct_option: Option<String>,
}

/// One row of the user-facing quiz catalog: quiz joined up to its subject,
/// with a live question count.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuizSummary {
    pub quiz_id: i64,
    pub subject_name: String,
    pub chapter_name: String,
    pub date_of_quiz: NaiveDate,
    pub time_duration: String,
    pub num_questions: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ChapterSummary {
    pub id: i64,
    pub subject_id: i64,
    pub name: String,
    pub question_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectWithChapters {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub chapters: Vec<ChapterSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizDetailResponse {
    pub quiz: QuizSummary,
    pub questions: Vec<crate::models::question::PublicQuestion>,
}
