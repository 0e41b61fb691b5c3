use axum::{
    extract::{Path, State},
    Extension, Json,
};

use crate::{
    api::AppState,
    error::AppResult,
    services::{
        mastery::{self, ContentHistory, ContentSummary},
        session::StudentSession,
    },
};

/// Handler for the mastery dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<StudentSession>,
) -> AppResult<Json<Vec<ContentSummary>>> {
    let summaries = mastery::dashboard(&state.db_pool, session.student_id).await?;
    Ok(Json(summaries))
}

pub async fn history(
    State(state): State<AppState>,
    Extension(session): Extension<StudentSession>,
    Path(content_id): Path<i64>,
) -> AppResult<Json<ContentHistory>> {
    let history = mastery::history(&state.db_pool, session.student_id, content_id).await?;
    Ok(Json(history))
}
