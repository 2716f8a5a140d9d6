use axum::{
    extract::State,
    response::{IntoResponse, Json, Response},
    Extension,
};

use crate::dto::dashboard_dto::UserSummaryResponse;
use crate::middleware::auth::AuthContext;
use crate::AppState;

#[axum::debug_handler]
pub async fn get_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> crate::error::Result<Response> {
    let history = state.history_service.get_user_history(auth.user_id).await?;
    Ok(Json(history).into_response())
}

#[axum::debug_handler]
pub async fn get_summary(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> crate::error::Result<Response> {
    let monthly = state.stats_service.monthly_attempts(auth.user_id).await?;
    let subjects = state
        .stats_service
        .attempts_by_subject_for_user(auth.user_id)
        .await?;
    Ok(Json(UserSummaryResponse { monthly, subjects }).into_response())
}

#[axum::debug_handler]
pub async fn get_subject_stats(State(state): State<AppState>) -> crate::error::Result<Response> {
    let rows = state.stats_service.attempts_by_subject().await?;
    Ok(Json(rows).into_response())
}

#[axum::debug_handler]
pub async fn get_chapter_stats(State(state): State<AppState>) -> crate::error::Result<Response> {
    let rows = state.stats_service.best_score_by_chapter().await?;
    Ok(Json(rows).into_response())
}
