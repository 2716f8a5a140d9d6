use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
    Extension,
};

use crate::dto::attempt_dto::{SubmitAttemptRequest, SubmitAttemptResponse};
use crate::dto::catalog_dto::QuizDetailResponse;
use crate::middleware::auth::AuthContext;
use crate::AppState;

#[axum::debug_handler]
pub async fn list_quizzes(State(state): State<AppState>) -> crate::error::Result<Response> {
    let quizzes = state.catalog_service.list_quizzes_for_catalog().await?;
    Ok(Json(quizzes).into_response())
}

/// Quiz detail for the quiz-taking view. Questions come from the public
/// projection, so the answer key never reaches the client.
#[axum::debug_handler]
pub async fn get_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> crate::error::Result<Response> {
    let quiz = state.catalog_service.get_quiz_overview(quiz_id).await?;
    let questions = state.catalog_service.list_quiz_questions(quiz_id).await?;
    Ok(Json(QuizDetailResponse { quiz, questions }).into_response())
}

#[axum::debug_handler]
pub async fn submit_quiz(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(quiz_id): Path<i64>,
    Json(req): Json<SubmitAttemptRequest>,
) -> crate::error::Result<Response> {
    let result = state
        .attempt_service
        .submit_attempt(quiz_id, auth.user_id, &req)
        .await?;

    let message = format!(
        "You scored {} out of {}",
        result.score, result.total_questions
    );
    Ok(Json(SubmitAttemptResponse {
        score: result.score,
        total_questions: result.total_questions,
        message,
    })
    .into_response())
}
