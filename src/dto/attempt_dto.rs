use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Submitted answers, keyed by question id. Option labels are the literal
/// slot names stored on the question ("option1".."option4").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAttemptRequest {
    pub answers: HashMap<i64, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitAttemptResponse {
    pub score: i64,
    pub total_questions: i64,
    pub message: String,
}
