use crate::dto::catalog_dto::{
    ChapterSummary, CreateChapterPayload, CreateQuestionPayload, CreateQuizPayload,
    CreateSubjectPayload, QuizSummary, SubjectWithChapters, UpdateChapterPayload,
    UpdateQuestionPayload, UpdateQuizPayload, UpdateSubjectPayload,
};
use crate::error::{Error, Result};
use crate::models::chapter::Chapter;
use crate::models::question::{PublicQuestion, Question};
use crate::models::quiz::Quiz;
use crate::models::subject::Subject;
use sqlx::SqlitePool;

/// Data access for the subject → chapter → quiz → question hierarchy.
///
/// Deletion contract: removing a subject, chapter, or quiz cascades through
/// the catalog chain, but is refused with `Conflict` while any recorded
/// attempt references an affected quiz. Questions can always be deleted;
/// scores reference quizzes, not questions.
#[derive(Clone)]
pub struct CatalogService {
    pool: SqlitePool,
}

impl CatalogService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ---- subjects ----

    pub async fn create_subject(&self, payload: CreateSubjectPayload) -> Result<Subject> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (name, description)
            VALUES (?, ?)
            RETURNING id, name, description
            "#,
        )
        .bind(payload.name)
        .bind(payload.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject)
    }

    pub async fn get_subject(&self, subject_id: i64) -> Result<Subject> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"SELECT id, name, description FROM subjects WHERE id = ?"#,
        )
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject)
    }

    pub async fn update_subject(
        &self,
        subject_id: i64,
        payload: UpdateSubjectPayload,
    ) -> Result<Subject> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            UPDATE subjects
            SET name = COALESCE(?, name),
                description = COALESCE(?, description)
            WHERE id = ?
            RETURNING id, name, description
            "#,
        )
        .bind(payload.name)
        .bind(payload.description)
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(subject)
    }

    pub async fn delete_subject(&self, subject_id: i64) -> Result<()> {
        let attempts: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM scores s
            JOIN quizzes z ON s.quiz_id = z.id
            JOIN chapters c ON z.chapter_id = c.id
            WHERE c.subject_id = ?
            "#,
        )
        .bind(subject_id)
        .fetch_one(&self.pool)
        .await?;
        if attempts > 0 {
            return Err(Error::Conflict(format!(
                "Subject {} has {} recorded attempts and cannot be deleted",
                subject_id, attempts
            )));
        }

        let result = sqlx::query("DELETE FROM subjects WHERE id = ?")
            .bind(subject_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Subject {} not found", subject_id)));
        }
        Ok(())
    }

    /// Admin dashboard shape: every subject with its chapters and each
    /// chapter's live question count.
    pub async fn list_subjects_with_chapters(&self) -> Result<Vec<SubjectWithChapters>> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"SELECT id, name, description FROM subjects ORDER BY id"#,
        )
        .fetch_all(&self.pool)
        .await?;

        let chapters = sqlx::query_as::<_, ChapterSummary>(
            r#"
            SELECT c.id, c.subject_id, c.name, COUNT(q.id) AS question_count
            FROM chapters c
            LEFT JOIN quizzes z ON z.chapter_id = c.id
            LEFT JOIN questions q ON q.quiz_id = z.id
            GROUP BY c.id, c.subject_id, c.name
            ORDER BY c.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut grouped: std::collections::HashMap<i64, Vec<ChapterSummary>> =
            std::collections::HashMap::new();
        for chapter in chapters {
            grouped.entry(chapter.subject_id).or_default().push(chapter);
        }

        Ok(subjects
            .into_iter()
            .map(|s| SubjectWithChapters {
                chapters: grouped.remove(&s.id).unwrap_or_default(),
                id: s.id,
                name: s.name,
                description: s.description,
            })
            .collect())
    }

    // ---- chapters ----

    pub async fn get_chapters(&self, subject_id: i64) -> Result<Vec<Chapter>> {
        self.get_subject(subject_id).await?;

        let chapters = sqlx::query_as::<_, Chapter>(
            r#"SELECT id, subject_id, name, description FROM chapters WHERE subject_id = ? ORDER BY id"#,
        )
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(chapters)
    }

    pub async fn create_chapter(
        &self,
        subject_id: i64,
        payload: CreateChapterPayload,
    ) -> Result<Chapter> {
        self.get_subject(subject_id).await?;

        let chapter = sqlx::query_as::<_, Chapter>(
            r#"
            INSERT INTO chapters (subject_id, name, description)
            VALUES (?, ?, ?)
            RETURNING id, subject_id, name, description
            "#,
        )
        .bind(subject_id)
        .bind(payload.name)
        .bind(payload.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(chapter)
    }

    pub async fn update_chapter(
        &self,
        chapter_id: i64,
        payload: UpdateChapterPayload,
    ) -> Result<Chapter> {
        let chapter = sqlx::query_as::<_, Chapter>(
            r#"
            UPDATE chapters
            SET name = COALESCE(?, name),
                description = COALESCE(?, description)
            WHERE id = ?
            RETURNING id, subject_id, name, description
            "#,
        )
        .bind(payload.name)
        .bind(payload.description)
        .bind(chapter_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(chapter)
    }

    pub async fn delete_chapter(&self, chapter_id: i64) -> Result<()> {
        let attempts: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM scores s
            JOIN quizzes z ON s.quiz_id = z.id
            WHERE z.chapter_id = ?
            "#,
        )
        .bind(chapter_id)
        .fetch_one(&self.pool)
        .await?;
        if attempts > 0 {
            return Err(Error::Conflict(format!(
                "Chapter {} has {} recorded attempts and cannot be deleted",
                chapter_id, attempts
            )));
        }

        let result = sqlx::query("DELETE FROM chapters WHERE id = ?")
            .bind(chapter_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Chapter {} not found", chapter_id)));
        }
        Ok(())
    }

    // ---- quizzes ----

    pub async fn create_quiz(&self, payload: CreateQuizPayload) -> Result<Quiz> {
        let chapter_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters WHERE id = ?")
            .bind(payload.chapter_id)
            .fetch_one(&self.pool)
            .await?;
        if chapter_exists == 0 {
            return Err(Error::NotFound(format!(
                "Chapter {} not found",
                payload.chapter_id
            )));
        }

        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            INSERT INTO quizzes (chapter_id, date_of_quiz, time_duration, remarks)
            VALUES (?, ?, ?, ?)
            RETURNING id, chapter_id, date_of_quiz, time_duration, remarks
            "#,
        )
        .bind(payload.chapter_id)
        .bind(payload.date_of_quiz)
        .bind(payload.time_duration)
        .bind(payload.remarks)
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn update_quiz(&self, quiz_id: i64, payload: UpdateQuizPayload) -> Result<Quiz> {
        let quiz = sqlx::query_as::<_, Quiz>(
            r#"
            UPDATE quizzes
            SET date_of_quiz = COALESCE(?, date_of_quiz),
                time_duration = COALESCE(?, time_duration),
                remarks = COALESCE(?, remarks)
            WHERE id = ?
            RETURNING id, chapter_id, date_of_quiz, time_duration, remarks
            "#,
        )
        .bind(payload.date_of_quiz)
        .bind(payload.time_duration)
        .bind(payload.remarks)
        .bind(quiz_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(quiz)
    }

    pub async fn delete_quiz(&self, quiz_id: i64) -> Result<()> {
        let attempts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM scores WHERE quiz_id = ?")
            .bind(quiz_id)
            .fetch_one(&self.pool)
            .await?;
        if attempts > 0 {
            return Err(Error::Conflict(format!(
                "Quiz {} has {} recorded attempts and cannot be deleted",
                quiz_id, attempts
            )));
        }

        let result = sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(quiz_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Quiz {} not found", quiz_id)));
        }
        Ok(())
    }

    pub async fn list_quizzes_for_catalog(&self) -> Result<Vec<QuizSummary>> {
        let quizzes = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT
                z.id AS quiz_id,
                su.name AS subject_name,
                c.name AS chapter_name,
                z.date_of_quiz,
                z.time_duration,
                COUNT(q.id) AS num_questions
            FROM quizzes z
            JOIN chapters c ON z.chapter_id = c.id
            JOIN subjects su ON c.subject_id = su.id
            LEFT JOIN questions q ON q.quiz_id = z.id
            GROUP BY z.id, su.name, c.name, z.date_of_quiz, z.time_duration
            ORDER BY z.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(quizzes)
    }

    pub async fn get_quiz_overview(&self, quiz_id: i64) -> Result<QuizSummary> {
        let quiz = sqlx::query_as::<_, QuizSummary>(
            r#"
            SELECT
                z.id AS quiz_id,
                su.name AS subject_name,
                c.name AS chapter_name,
                z.date_of_quiz,
                z.time_duration,
                COUNT(q.id) AS num_questions
            FROM quizzes z
            JOIN chapters c ON z.chapter_id = c.id
            JOIN subjects su ON c.subject_id = su.id
            LEFT JOIN questions q ON q.quiz_id = z.id
            WHERE z.id = ?
            GROUP BY z.id, su.name, c.name, z.date_of_quiz, z.time_duration
            "#,
        )
        .bind(quiz_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Quiz {} not found", quiz_id)))?;

        Ok(quiz)
    }

    // ---- questions ----

    /// The quiz-taking projection. The query never selects `correct_option`,
    /// so the answer key cannot leak into client payloads.
    pub async fn list_quiz_questions(&self, quiz_id: i64) -> Result<Vec<PublicQuestion>> {
        self.get_quiz_overview(quiz_id).await?;

        let questions = sqlx::query_as::<_, PublicQuestion>(
            r#"
            SELECT id, quiz_id, question_title, question_statement,
                   option1, option2, option3, option4
            FROM questions
            WHERE quiz_id = ?
            ORDER BY id
            "#,
        )
        .bind(quiz_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(questions)
    }

    pub async fn create_question(&self, payload: CreateQuestionPayload) -> Result<Question> {
        let quiz_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quizzes WHERE id = ?")
            .bind(payload.quiz_id)
            .fetch_one(&self.pool)
            .await?;
        if quiz_exists == 0 {
            return Err(Error::NotFound(format!(
                "Quiz {} not found",
                payload.quiz_id
            )));
        }

        ensure_correct_option_populated(
            &payload.correct_option,
            &payload.option1,
            &payload.option2,
            payload.option3.as_deref(),
            payload.option4.as_deref(),
        )?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            INSERT INTO questions (
                quiz_id, question_title, question_statement,
                option1, option2, option3, option4, correct_option
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id, quiz_id, question_title, question_statement,
                      option1, option2, option3, option4, correct_option
            "#,
        )
        .bind(payload.quiz_id)
        .bind(payload.question_title)
        .bind(payload.question_statement)
        .bind(payload.option1)
        .bind(payload.option2)
        .bind(payload.option3)
        .bind(payload.option4)
        .bind(payload.correct_option)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn update_question(
        &self,
        question_id: i64,
        payload: UpdateQuestionPayload,
    ) -> Result<Question> {
        let existing = sqlx::query_as::<_, Question>(
            r#"
            SELECT id, quiz_id, question_title, question_statement,
                   option1, option2, option3, option4, correct_option
            FROM questions WHERE id = ?
            "#,
        )
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;

        let Question {
            id,
            quiz_id,
            question_title,
            question_statement,
            option1,
            option2,
            option3,
            option4,
            correct_option,
        } = existing;
        let merged = Question {
            id,
            quiz_id,
            question_title: payload.question_title.unwrap_or(question_title),
            question_statement: payload.question_statement.unwrap_or(question_statement),
            option1: payload.option1.unwrap_or(option1),
            option2: payload.option2.unwrap_or(option2),
            option3: payload.option3.or(option3),
            option4: payload.option4.or(option4),
            correct_option: payload.correct_option.unwrap_or(correct_option),
        };

        ensure_correct_option_populated(
            &merged.correct_option,
            &merged.option1,
            &merged.option2,
            merged.option3.as_deref(),
            merged.option4.as_deref(),
        )?;

        let question = sqlx::query_as::<_, Question>(
            r#"
            UPDATE questions
            SET question_title = ?, question_statement = ?,
                option1 = ?, option2 = ?, option3 = ?, option4 = ?,
                correct_option = ?
            WHERE id = ?
            RETURNING id, quiz_id, question_title, question_statement,
                      option1, option2, option3, option4, correct_option
            "#,
        )
        .bind(merged.question_title)
        .bind(merged.question_statement)
        .bind(merged.option1)
        .bind(merged.option2)
        .bind(merged.option3)
        .bind(merged.option4)
        .bind(merged.correct_option)
        .bind(question_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(question)
    }

    pub async fn delete_question(&self, question_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM questions WHERE id = ?")
            .bind(question_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!(
                "Question {} not found",
                question_id
            )));
        }
        Ok(())
    }
}

fn ensure_correct_option_populated(
    correct_option: &str,
    option1: &str,
    option2: &str,
    option3: Option<&str>,
    option4: Option<&str>,
) -> Result<()> {
    let target = match correct_option {
        "option1" => Some(option1),
        "option2" => Some(option2),
        "option3" => option3,
        "option4" => option4,
        _ => None,
    };
    match target {
        Some(text) if !text.trim().is_empty() => Ok(()),
        _ => Err(Error::BadRequest(format!(
            "correct_option '{}' does not reference a populated option",
            correct_option
        ))),
    }
}
