use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full question record including the answer key. Server-side only: never
/// serialized into quiz-taking payloads, which use [`PublicQuestion`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Question {
    pub id: i64,
    pub quiz_id: i64,
    pub question_title: String,
    pub question_statement: String,
    pub option1: String,
    pub option2: String,
    pub option3: Option<String>,
    pub option4: Option<String>,
    pub correct_option: String,
}

/// Client projection of a question with the answer key stripped.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PublicQuestion {
    pub id: i64,
    pub quiz_id: i64,
    pub question_title: String,
    pub question_statement: String,
    pub option1: String,
    pub option2: String,
    pub option3: Option<String>,
    pub option4: Option<String>,
}
