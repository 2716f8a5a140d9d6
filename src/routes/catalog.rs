use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use validator::Validate;

use crate::dto::catalog_dto::{
    CreateChapterPayload, CreateQuestionPayload, CreateQuizPayload, CreateSubjectPayload,
    UpdateChapterPayload, UpdateQuestionPayload, UpdateQuizPayload, UpdateSubjectPayload,
};
use crate::AppState;

// ---- subjects ----

#[axum::debug_handler]
pub async fn list_subjects(State(state): State<AppState>) -> crate::error::Result<Response> {
    let subjects = state.catalog_service.list_subjects_with_chapters().await?;
    Ok(Json(subjects).into_response())
}

#[axum::debug_handler]
pub async fn create_subject(
    State(state): State<AppState>,
    Json(payload): Json<CreateSubjectPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let subject = state.catalog_service.create_subject(payload).await?;
    Ok((StatusCode::CREATED, Json(subject)).into_response())
}

#[axum::debug_handler]
pub async fn update_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<i64>,
    Json(payload): Json<UpdateSubjectPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let subject = state
        .catalog_service
        .update_subject(subject_id, payload)
        .await?;
    Ok(Json(subject).into_response())
}

#[axum::debug_handler]
pub async fn delete_subject(
    State(state): State<AppState>,
    Path(subject_id): Path<i64>,
) -> crate::error::Result<Response> {
    state.catalog_service.delete_subject(subject_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ---- chapters ----

#[axum::debug_handler]
pub async fn list_chapters(
    State(state): State<AppState>,
    Path(subject_id): Path<i64>,
) -> crate::error::Result<Response> {
    let chapters = state.catalog_service.get_chapters(subject_id).await?;
    Ok(Json(chapters).into_response())
}

#[axum::debug_handler]
pub async fn create_chapter(
    State(state): State<AppState>,
    Path(subject_id): Path<i64>,
    Json(payload): Json<CreateChapterPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let chapter = state
        .catalog_service
        .create_chapter(subject_id, payload)
        .await?;
    Ok((StatusCode::CREATED, Json(chapter)).into_response())
}

#[axum::debug_handler]
pub async fn update_chapter(
    State(state): State<AppState>,
    Path(chapter_id): Path<i64>,
    Json(payload): Json<UpdateChapterPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let chapter = state
        .catalog_service
        .update_chapter(chapter_id, payload)
        .await?;
    Ok(Json(chapter).into_response())
}

#[axum::debug_handler]
pub async fn delete_chapter(
    State(state): State<AppState>,
    Path(chapter_id): Path<i64>,
) -> crate::error::Result<Response> {
    state.catalog_service.delete_chapter(chapter_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ---- quizzes ----

#[axum::debug_handler]
pub async fn list_quizzes(State(state): State<AppState>) -> crate::error::Result<Response> {
    let quizzes = state.catalog_service.list_quizzes_for_catalog().await?;
    Ok(Json(quizzes).into_response())
}

#[axum::debug_handler]
pub async fn create_quiz(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuizPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let quiz = state.catalog_service.create_quiz(payload).await?;
    Ok((StatusCode::CREATED, Json(quiz)).into_response())
}

#[axum::debug_handler]
pub async fn update_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
    Json(payload): Json<UpdateQuizPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let quiz = state.catalog_service.update_quiz(quiz_id, payload).await?;
    Ok(Json(quiz).into_response())
}

#[axum::debug_handler]
pub async fn delete_quiz(
    State(state): State<AppState>,
    Path(quiz_id): Path<i64>,
) -> crate::error::Result<Response> {
    state.catalog_service.delete_quiz(quiz_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}

// ---- questions ----

#[axum::debug_handler]
pub async fn create_question(
    State(state): State<AppState>,
    Json(payload): Json<CreateQuestionPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let question = state.catalog_service.create_question(payload).await?;
    Ok((StatusCode::CREATED, Json(question)).into_response())
}

#[axum::debug_handler]
pub async fn update_question(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
    Json(payload): Json<UpdateQuestionPayload>,
) -> crate::error::Result<Response> {
    payload.validate()?;
    let question = state
        .catalog_service
        .update_question(question_id, payload)
        .await?;
    Ok(Json(question).into_response())
}

#[axum::debug_handler]
pub async fn delete_question(
    State(state): State<AppState>,
    Path(question_id): Path<i64>,
) -> crate::error::Result<Response> {
    state.catalog_service.delete_question(question_id).await?;
    Ok(StatusCode::NO_CONTENT.into_response())
}
