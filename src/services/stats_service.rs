use crate::dto::dashboard_dto::{ChapterBestScore, MonthlyAttempts, SubjectAttemptCount};
use crate::error::Result;
use sqlx::SqlitePool;

/// Read-only aggregates over the score table joined to the catalog
/// hierarchy. All queries use inner joins, so catalog nodes without any
/// recorded attempt are omitted rather than zero-filled, and every query
/// renders the empty case as an empty list.
#[derive(Clone)]
pub struct StatsService {
    pool: SqlitePool,
}

impl StatsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn attempts_by_subject(&self) -> Result<Vec<SubjectAttemptCount>> {
        let rows = sqlx::query_as::<_, SubjectAttemptCount>(
            r#"
            SELECT su.id AS subject_id, su.name AS subject_name, COUNT(s.id) AS attempts
            FROM scores s
            JOIN quizzes z ON s.quiz_id = z.id
            JOIN chapters c ON z.chapter_id = c.id
            JOIN subjects su ON c.subject_id = su.id
            GROUP BY su.id, su.name
            ORDER BY su.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn best_score_by_chapter(&self) -> Result<Vec<ChapterBestScore>> {
        let rows = sqlx::query_as::<_, ChapterBestScore>(
            r#"
            SELECT c.id AS chapter_id, c.name AS chapter_name, MAX(s.total_scored) AS best_score
            FROM scores s
            JOIN quizzes z ON s.quiz_id = z.id
            JOIN chapters c ON z.chapter_id = c.id
            GROUP BY c.id, c.name
            ORDER BY c.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// One user's attempts bucketed by calendar month, ascending by the
    /// `YYYY-MM` month string.
    pub async fn monthly_attempts(&self, user_id: i64) -> Result<MonthlyAttempts> {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT strftime('%Y-%m', time_stamp_of_attempt) AS month, COUNT(*) AS attempts
            FROM scores
            WHERE user_id = ?
            GROUP BY month
            ORDER BY month
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        let (months, counts) = rows.into_iter().unzip();
        Ok(MonthlyAttempts { months, counts })
    }

    pub async fn attempts_by_subject_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<SubjectAttemptCount>> {
        let rows = sqlx::query_as::<_, SubjectAttemptCount>(
            r#"
            SELECT su.id AS subject_id, su.name AS subject_name, COUNT(s.id) AS attempts
            FROM scores s
            JOIN quizzes z ON s.quiz_id = z.id
            JOIN chapters c ON z.chapter_id = c.id
            JOIN subjects su ON c.subject_id = su.id
            WHERE s.user_id = ?
            GROUP BY su.id, su.name
            ORDER BY su.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
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

    // Two subjects, one chapter and one quiz each. Only the first subject
    // receives attempts; the second must stay invisible to the aggregates.
    async fn seed(pool: &SqlitePool) {
        sqlx::query(
            r#"INSERT INTO users (email, password_hash, is_admin, fullname, date_of_birth, qualification)
               VALUES ('u@example.com', 'x', FALSE, 'User', '2000-01-01', 'BSc')"#,
        )
        .execute(pool)
        .await
        .unwrap();

        for name in ["Maths", "History"] {
            sqlx::query("INSERT INTO subjects (name, description) VALUES (?, NULL)")
                .bind(name)
                .execute(pool)
                .await
                .unwrap();
        }
        sqlx::query("INSERT INTO chapters (subject_id, name, description) VALUES (1, 'Algebra', NULL)")
            .execute(pool)
            .await
            .unwrap();
        sqlx::query("INSERT INTO chapters (subject_id, name, description) VALUES (2, 'Antiquity', NULL)")
            .execute(pool)
            .await
            .unwrap();
        for chapter_id in [1, 2] {
            sqlx::query(
                "INSERT INTO quizzes (chapter_id, date_of_quiz, time_duration, remarks) VALUES (?, '2024-01-01', '00:30', NULL)",
            )
            .bind(chapter_id)
            .execute(pool)
            .await
            .unwrap();
        }
    }

    async fn record_attempt(pool: &SqlitePool, quiz_id: i64, ts: chrono::DateTime<Utc>, scored: i64) {
        sqlx::query(
            "INSERT INTO scores (quiz_id, user_id, time_stamp_of_attempt, total_scored) VALUES (?, 1, ?, ?)",
        )
        .bind(quiz_id)
        .bind(ts)
        .bind(scored)
        .execute(pool)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn subjects_without_attempts_are_omitted() {
        let pool = setup_test_db().await;
        seed(&pool).await;
        let ts = Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap();
        record_attempt(&pool, 1, ts, 2).await;
        record_attempt(&pool, 1, ts, 3).await;

        let service = StatsService::new(pool);
        let rows = service.attempts_by_subject().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject_name, "Maths");
        assert_eq!(rows[0].attempts, 2);
    }

    #[tokio::test]
    async fn best_score_is_the_maximum_observed() {
        let pool = setup_test_db().await;
        seed(&pool).await;
        let ts = Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap();
        for scored in [2, 5, 3] {
            record_attempt(&pool, 1, ts, scored).await;
        }

        let service = StatsService::new(pool);
        let rows = service.best_score_by_chapter().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].chapter_name, "Algebra");
        assert_eq!(rows[0].best_score, 5);
    }

    #[tokio::test]
    async fn monthly_counts_are_ascending_by_month() {
        let pool = setup_test_db().await;
        seed(&pool).await;
        record_attempt(&pool, 1, Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(), 1).await;
        record_attempt(&pool, 1, Utc.with_ymd_and_hms(2024, 1, 20, 9, 0, 0).unwrap(), 2).await;
        record_attempt(&pool, 1, Utc.with_ymd_and_hms(2024, 3, 2, 9, 0, 0).unwrap(), 3).await;

        let service = StatsService::new(pool);
        let monthly = service.monthly_attempts(1).await.unwrap();

        assert_eq!(monthly.months, vec!["2024-01", "2024-03"]);
        assert_eq!(monthly.counts, vec![2, 1]);
    }

    #[tokio::test]
    async fn empty_system_yields_empty_aggregates() {
        let pool = setup_test_db().await;
        seed(&pool).await;

        let service = StatsService::new(pool);
        assert!(service.attempts_by_subject().await.unwrap().is_empty());
        assert!(service.best_score_by_chapter().await.unwrap().is_empty());
        let monthly = service.monthly_attempts(1).await.unwrap();
        assert!(monthly.months.is_empty());
        assert!(monthly.counts.is_empty());
        assert!(service
            .attempts_by_subject_for_user(1)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn per_user_subject_counts_are_filtered_to_that_user() {
        let pool = setup_test_db().await;
        seed(&pool).await;
        sqlx::query(
            r#"INSERT INTO users (email, password_hash, is_admin, fullname, date_of_birth, qualification)
               VALUES ('other@example.com', 'x', FALSE, 'Other', '2000-01-01', 'BSc')"#,
        )
        .execute(&pool)
        .await
        .unwrap();

        let ts = Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap();
        record_attempt(&pool, 1, ts, 1).await;
        sqlx::query(
            "INSERT INTO scores (quiz_id, user_id, time_stamp_of_attempt, total_scored) VALUES (2, 2, ?, 4)",
        )
        .bind(ts)
        .execute(&pool)
        .await
        .unwrap();

        let service = StatsService::new(pool);
        let rows = service.attempts_by_subject_for_user(1).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject_name, "Maths");
        assert_eq!(rows[0].attempts, 1);
    }
}
