use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{content, events},
    error::{AppError, AppResult},
    models::{Content, FeedbackEvent, FeedbackSignal, Layer, QuizAttempt, QuizOption, LAYER_COUNT},
    services::{
        generator::TextGenerator,
        navigation::{navigate, Transition},
        quiz::generate_quiz,
        session::{ActiveContent, PendingQuiz, SessionState},
    },
};

/// The explanation a student is currently reading
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LayerView {
    pub content_id: i64,
    pub layer: Layer,
    pub text: String,
    pub layer_count: usize,
}

impl LayerView {
    fn of(active: &ActiveContent) -> Self {
        Self {
            content_id: active.content.id,
            layer: active.layer,
            text: active.content.layer_text(active.layer).to_string(),
            layer_count: LAYER_COUNT,
        }
    }
}

/// Outcome of one feedback submission
#[derive(Debug, Clone, Serialize)]
pub struct FeedbackOutcome {
    pub transition: Transition,
    pub event: FeedbackEvent,
    pub current: LayerView,
}

/// A quiz question as shown to the student, without its answer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuizQuestionView {
    pub index: usize,
    pub question: String,
    pub options: Vec<QuizOption>,
}

/// Makes freshly distilled content the active one, at the simplest layer
pub fn activate(state: &mut SessionState, content: Content) -> LayerView {
    let active = ActiveContent::new(content);
    let view = LayerView::of(&active);
    state.active = Some(active);
    view
}

/// Reopens one of the student's earlier contents
pub async fn open_content(
    pool: &SqlitePool,
    state: &mut SessionState,
    content_id: i64,
) -> AppResult<LayerView> {
    let content = content::find_owned(pool, content_id, state.student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("content {}", content_id)))?;

    tracing::info!(student_id = state.student_id, content_id, "Content opened");
    Ok(activate(state, content))
}

pub fn current_layer(state: &SessionState) -> AppResult<LayerView> {
    state.active().map(LayerView::of)
}

/// Logs a feedback signal against the layer being read, then moves
///
/// The event is recorded at the layer the student was on, before the move.
/// A clamped signal is still recorded and leaves the layer unchanged.
pub async fn record_feedback(
    pool: &SqlitePool,
    state: &mut SessionState,
    signal: FeedbackSignal,
) -> AppResult<FeedbackOutcome> {
    let student_id = state.student_id;
    let active = state.active_mut()?;
    let transition = navigate(active.layer, signal);

    let event = events::append_feedback(
        pool,
        student_id,
        active.content.id,
        transition.from,
        signal,
    )
    .await?;

    if transition.clamped {
        tracing::info!(
            student_id,
            content_id = active.content.id,
            layer = %transition.from,
            signal = signal.as_str(),
            "Feedback absorbed at layer boundary"
        );
    } else if transition.to != transition.from {
        active.layer = transition.to;
        active.quiz = None;
        tracing::debug!(
            student_id,
            content_id = active.content.id,
            from = %transition.from,
            to = %transition.to,
            "Layer changed"
        );
    }

    Ok(FeedbackOutcome {
        transition,
        event,
        current: LayerView::of(active),
    })
}

/// Generates a quiz for the layer being read and keeps it pending in the session
pub async fn start_quiz(
    generator: &dyn TextGenerator,
    state: &mut SessionState,
    question_count: usize,
) -> AppResult<Vec<QuizQuestionView>> {
    let active = state.active_mut()?;
    let layer = active.layer;
    let questions =
        generate_quiz(generator, active.content.layer_text(layer), question_count).await?;

    let views = questions
        .iter()
        .enumerate()
        .map(|(index, q)| QuizQuestionView {
            index,
            question: q.question.clone(),
            options: q.options.clone(),
        })
        .collect();

    active.quiz = Some(PendingQuiz { layer, questions });
    Ok(views)
}

/// Grades one answer to the pending quiz and logs the attempt
///
/// Questions may be answered more than once; each answer is a new attempt.
pub async fn answer_quiz(
    pool: &SqlitePool,
    state: &SessionState,
    question_index: usize,
    answer: &str,
) -> AppResult<QuizAttempt> {
    if answer.trim().is_empty() {
        return Err(AppError::InvalidInput("Answer cannot be empty".to_string()));
    }

    let student_id = state.student_id;
    let active = state.active()?;
    let quiz = active
        .quiz
        .as_ref()
        .ok_or_else(|| AppError::InvalidInput("No quiz in progress".to_string()))?;
    let question = quiz.questions.get(question_index).ok_or_else(|| {
        AppError::InvalidInput(format!("Quiz has no question {}", question_index))
    })?;

    let attempt = events::append_quiz_attempt(
        pool,
        student_id,
        active.content.id,
        quiz.layer,
        question,
        answer,
    )
    .await?;

    tracing::info!(
        student_id,
        content_id = attempt.content_id,
        is_correct = attempt.is_correct,
        "Quiz answer recorded"
    );

    Ok(attempt)
}
