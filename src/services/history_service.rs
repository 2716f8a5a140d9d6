use crate::dto::dashboard_dto::AttemptSummary;
use crate::error::Result;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct HistoryService {
    pool: SqlitePool,
}

impl HistoryService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Past attempts for one user, most recent first. A user with no attempts
    /// gets an empty list, never an error.
    pub async fn get_user_history(&self, user_id: i64) -> Result<Vec<AttemptSummary>> {
        let history = sqlx::query_as::<_, AttemptSummary>(
            r#"
            SELECT
                s.quiz_id,
                c.name AS chapter_name,
                s.total_scored,
                (SELECT COUNT(*) FROM questions q WHERE q.quiz_id = s.quiz_id) AS total_questions,
                s.time_stamp_of_attempt AS attempted_at
            FROM scores s
            JOIN quizzes z ON s.quiz_id = z.id
            JOIN chapters c ON z.chapter_id = c.id
            WHERE s.user_id = ?
            ORDER BY s.time_stamp_of_attempt DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(history)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sqlx::sqlite::SqlitePoolOptions;

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

    async fn seed_catalog(pool: &SqlitePool) -> (i64, i64) {
        sqlx::query(
            r#"INSERT INTO users (email, password_hash, is_admin, fullname, date_of_birth, qualification)
               VALUES ('u@example.com', 'x', FALSE, 'User', '2000-01-01', 'BSc')"#,
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO subjects (name, description) VALUES ('Physics', NULL)")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO chapters (subject_id, name, description) VALUES (1, 'Optics', NULL)")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO quizzes (chapter_id, date_of_quiz, time_duration, remarks) VALUES (1, '2024-06-01', '00:20', NULL)",
        )
        .execute(pool)
        .await
        .unwrap();
        sqlx::query(
            r#"INSERT INTO questions (quiz_id, question_title, question_statement, option1, option2, option3, option4, correct_option)
               VALUES (1, 'Q1', 's', 'a', 'b', NULL, NULL, 'option1')"#,
        )
        .execute(pool)
        .await
        .unwrap();
        (1, 1)
    }

    #[tokio::test]
    async fn history_is_ordered_most_recent_first() {
        let pool = setup_test_db().await;
        let (quiz_id, user_id) = seed_catalog(&pool).await;

        let earlier = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 3, 5, 18, 30, 0).unwrap();
        for (ts, scored) in [(earlier, 2_i64), (later, 4_i64)] {
            sqlx::query(
                "INSERT INTO scores (quiz_id, user_id, time_stamp_of_attempt, total_scored) VALUES (?, ?, ?, ?)",
            )
            .bind(quiz_id)
            .bind(user_id)
            .bind(ts)
            .bind(scored)
            .execute(&pool)
            .await
            .unwrap();
        }

        let service = HistoryService::new(pool);
        let history = service.get_user_history(user_id).await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].total_scored, 4);
        assert_eq!(history[1].total_scored, 2);
        assert!(history[0].attempted_at > history[1].attempted_at);
        assert_eq!(history[0].chapter_name, "Optics");
        assert_eq!(history[0].total_questions, 1);
    }

    #[tokio::test]
    async fn user_with_no_attempts_gets_empty_history() {
        let pool = setup_test_db().await;
        let (_quiz_id, user_id) = seed_catalog(&pool).await;

        let service = HistoryService::new(pool);
        let history = service.get_user_history(user_id).await.unwrap();
        assert!(history.is_empty());
    }
}
