use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::{FeedbackSignal, QuizAttempt},
    services::{
        distill::{self, DistillInput},
        session::StudentSession,
        tutor::{self, FeedbackOutcome, LayerView, QuizQuestionView},
    },
};

#[derive(Debug, Deserialize)]
pub struct DistillRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub signal: FeedbackSignal,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Zero-based index into the pending quiz
    pub question: usize,
    pub answer: String,
}

async fn distill_and_activate(
    state: &AppState,
    session: &StudentSession,
    input: DistillInput,
) -> AppResult<(StatusCode, Json<LayerView>)> {
    // Held across generation so a second request in this session waits
    let mut guard = session.state.lock().await;

    let content = distill::distill(
        &state.db_pool,
        state.generator.as_ref(),
        state.extractor.clone(),
        session.student_id,
        input,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(tutor::activate(&mut guard, content))))
}

/// Handler for distilling pasted text
pub async fn distill_text(
    State(state): State<AppState>,
    Extension(session): Extension<StudentSession>,
    Json(request): Json<DistillRequest>,
) -> AppResult<(StatusCode, Json<LayerView>)> {
    let input = DistillInput {
        text: Some(request.text),
        document: None,
    };
    distill_and_activate(&state, &session, input).await
}

/// Handler for multipart distillation with optional `text` and `document` fields
pub async fn distill_upload(
    State(state): State<AppState>,
    Extension(session): Extension<StudentSession>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<LayerView>)> {
    let mut input = DistillInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))?
    {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("text") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?;
                input.text = Some(text);
            }
            Some("document") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidInput(e.to_string()))?;
                input.document = Some(bytes.to_vec());
            }
            other => {
                tracing::debug!(field = ?other, "Ignoring unknown multipart field");
            }
        }
    }

    distill_and_activate(&state, &session, input).await
}

/// Handler for reopening an earlier content
pub async fn open_content(
    State(state): State<AppState>,
    Extension(session): Extension<StudentSession>,
    Path(content_id): Path<i64>,
) -> AppResult<Json<LayerView>> {
    let mut guard = session.state.lock().await;
    let view = tutor::open_content(&state.db_pool, &mut guard, content_id).await?;
    Ok(Json(view))
}

pub async fn current_layer(
    Extension(session): Extension<StudentSession>,
) -> AppResult<Json<LayerView>> {
    let guard = session.state.lock().await;
    Ok(Json(tutor::current_layer(&guard)?))
}

/// Handler for the three feedback buttons
pub async fn feedback(
    State(state): State<AppState>,
    Extension(session): Extension<StudentSession>,
    Json(request): Json<FeedbackRequest>,
) -> AppResult<Json<FeedbackOutcome>> {
    let mut guard = session.state.lock().await;
    let outcome = tutor::record_feedback(&state.db_pool, &mut guard, request.signal).await?;
    Ok(Json(outcome))
}

pub async fn start_quiz(
    State(state): State<AppState>,
    Extension(session): Extension<StudentSession>,
) -> AppResult<Json<Vec<QuizQuestionView>>> {
    let mut guard = session.state.lock().await;
    let questions = tutor::start_quiz(
        state.generator.as_ref(),
        &mut guard,
        state.settings.quiz_question_count,
    )
    .await?;
    Ok(Json(questions))
}

pub async fn answer_quiz(
    State(state): State<AppState>,
    Extension(session): Extension<StudentSession>,
    Json(request): Json<AnswerRequest>,
) -> AppResult<Json<QuizAttempt>> {
    let guard = session.state.lock().await;
    let attempt =
        tutor::answer_quiz(&state.db_pool, &guard, request.question, &request.answer).await?;
    Ok(Json(attempt))
}
