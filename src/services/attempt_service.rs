use crate::dto::attempt_dto::SubmitAttemptRequest;
use crate::error::{Error, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use std::collections::HashMap;

#[derive(Debug, Clone, serde::Serialize)]
pub struct AttemptResult {
    pub score: i64,
    pub total_questions: i64,
}

#[derive(Clone)]
pub struct AttemptService {
    pool: SqlitePool,
}

impl AttemptService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Scores a submission against the quiz's answer key and records exactly
    /// one score row. The insert runs in its own transaction: an aborted
    /// request leaves no partial attempt behind.
    pub async fn submit_attempt(
        &self,
        quiz_id: i64,
        user_id: i64,
        req: &SubmitAttemptRequest,
    ) -> Result<AttemptResult> {
        let answer_key: Vec<(i64, String)> =
            sqlx::query_as(r#"SELECT id, correct_option FROM questions WHERE quiz_id = ?"#)
                .bind(quiz_id)
                .fetch_all(&self.pool)
                .await?;

        if answer_key.is_empty() {
            return Err(Error::NotFound(format!(
                "No questions found for quiz {}",
                quiz_id
            )));
        }

        let score = score_submission(&answer_key, &req.answers);
        let attempted_at = Utc::now();

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO scores (quiz_id, user_id, time_stamp_of_attempt, total_scored)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(quiz_id)
        .bind(user_id)
        .bind(attempted_at)
        .bind(score)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        tracing::info!(quiz_id, user_id, score, "attempt recorded");

        Ok(AttemptResult {
            score,
            total_questions: answer_key.len() as i64,
        })
    }
}

/// Counts submitted labels that exactly match the stored correct option.
/// Unanswered questions score zero; submissions for unknown question ids are
/// ignored. The result is a raw correct count, not a percentage.
fn score_submission(answer_key: &[(i64, String)], answers: &HashMap<i64, String>) -> i64 {
    answer_key
        .iter()
        .filter(|(question_id, correct_option)| {
            answers
                .get(question_id)
                .map(|selected| selected == correct_option)
                .unwrap_or(false)
        })
        .count() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    fn key(entries: &[(i64, &str)]) -> Vec<(i64, String)> {
        entries.iter().map(|(id, o)| (*id, o.to_string())).collect()
    }

    fn answers(entries: &[(i64, &str)]) -> HashMap<i64, String> {
        entries.iter().map(|(id, o)| (*id, o.to_string())).collect()
    }

    #[test]
    fn scores_exact_label_matches_only() {
        let k = key(&[(1, "option1"), (2, "option2"), (3, "option3")]);
        let a = answers(&[(1, "option1"), (2, "option2"), (3, "option1")]);
        assert_eq!(score_submission(&k, &a), 2);
    }

    #[test]
    fn partial_submission_counts_unanswered_as_incorrect() {
        // Worked example: question 3 unanswered, question 2 wrong.
        let k = key(&[(1, "option1"), (2, "option2"), (3, "option3")]);
        let a = answers(&[(1, "option1"), (2, "option4")]);
        assert_eq!(score_submission(&k, &a), 1);
    }

    #[test]
    fn unknown_question_ids_are_ignored() {
        let k = key(&[(1, "option1")]);
        let a = answers(&[(1, "option1"), (99, "option1")]);
        assert_eq!(score_submission(&k, &a), 1);
    }

    #[test]
    fn empty_submission_scores_zero() {
        let k = key(&[(1, "option1"), (2, "option2")]);
        assert_eq!(score_submission(&k, &HashMap::new()), 0);
    }

    async fn setup_test_db() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create test pool");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        pool
    }

    async fn seed_quiz(pool: &SqlitePool) -> (i64, i64) {
        sqlx::query(
            r#"INSERT INTO users (email, password_hash, is_admin, fullname, date_of_birth, qualification)
               VALUES ('taker@example.com', 'x', FALSE, 'Quiz Taker', '2000-01-01', 'BSc')"#,
        )
        .execute(pool)
        .await
        .expect("seed user");
        let user_id: i64 = sqlx::query_scalar("SELECT id FROM users WHERE email = 'taker@example.com'")
            .fetch_one(pool)
            .await
            .unwrap();

        sqlx::query("INSERT INTO subjects (name, description) VALUES ('Maths', NULL)")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO chapters (subject_id, name, description) VALUES (1, 'Algebra', NULL)")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO quizzes (chapter_id, date_of_quiz, time_duration, remarks) VALUES (1, '2024-06-01', '00:30', NULL)",
        )
        .execute(pool)
        .await
        .unwrap();
        let quiz_id: i64 = sqlx::query_scalar("SELECT id FROM quizzes LIMIT 1")
            .fetch_one(pool)
            .await
            .unwrap();

        for (title, correct) in [("Q1", "option1"), ("Q2", "option2"), ("Q3", "option3")] {
            sqlx::query(
                r#"INSERT INTO questions (quiz_id, question_title, question_statement, option1, option2, option3, option4, correct_option)
                   VALUES (?, ?, 'statement', 'a', 'b', 'c', 'd', ?)"#,
            )
            .bind(quiz_id)
            .bind(title)
            .bind(correct)
            .execute(pool)
            .await
            .unwrap();
        }

        (quiz_id, user_id)
    }

    #[tokio::test]
    async fn submit_attempt_persists_one_score_row() {
        let pool = setup_test_db().await;
        let (quiz_id, user_id) = seed_quiz(&pool).await;
        let service = AttemptService::new(pool.clone());

        let question_ids: Vec<i64> =
            sqlx::query_scalar("SELECT id FROM questions WHERE quiz_id = ? ORDER BY id")
                .bind(quiz_id)
                .fetch_all(&pool)
                .await
                .unwrap();

        let mut submitted = HashMap::new();
        submitted.insert(question_ids[0], "option1".to_string());
        submitted.insert(question_ids[1], "option4".to_string());
        let result = service
            .submit_attempt(quiz_id, user_id, &SubmitAttemptRequest { answers: submitted })
            .await
            .unwrap();

        assert_eq!(result.score, 1);
        assert_eq!(result.total_questions, 3);

        let (count, stored): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(MAX(total_scored), -1) FROM scores WHERE quiz_id = ? AND user_id = ?",
        )
        .bind(quiz_id)
        .bind(user_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(stored, 1);
    }

    #[tokio::test]
    async fn resubmission_appends_a_second_row() {
        let pool = setup_test_db().await;
        let (quiz_id, user_id) = seed_quiz(&pool).await;
        let service = AttemptService::new(pool.clone());

        let req = SubmitAttemptRequest {
            answers: HashMap::new(),
        };
        service.submit_attempt(quiz_id, user_id, &req).await.unwrap();
        service.submit_attempt(quiz_id, user_id, &req).await.unwrap();

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scores WHERE quiz_id = ? AND user_id = ?")
            .bind(quiz_id)
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }

    #[tokio::test]
    async fn quiz_without_questions_is_not_found() {
        let pool = setup_test_db().await;
        let (_quiz_id, user_id) = seed_quiz(&pool).await;
        let service = AttemptService::new(pool.clone());

        let err = service
            .submit_attempt(
                9999,
                user_id,
                &SubmitAttemptRequest {
                    answers: HashMap::new(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
