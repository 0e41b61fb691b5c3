use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    db::content::ensure_owned,
    error::{AppError, AppResult},
    models::{
        FeedbackEvent, FeedbackRow, FeedbackSignal, Layer, QuizAttempt, QuizQuestion, QuizRow,
    },
};

/// Appends one feedback event
///
/// The ownership check and the insert share a transaction, so an event can
/// never reference content that belongs to another student.
pub async fn append_feedback(
    pool: &SqlitePool,
    student_id: i64,
    content_id: i64,
    layer: Layer,
    signal: FeedbackSignal,
) -> AppResult<FeedbackEvent> {
    let mut tx = pool.begin().await?;
    ensure_owned(&mut tx, content_id, student_id).await?;

    let created_at = Utc::now();
    let understood = signal.is_understood();

    let done = sqlx::query(
        "INSERT INTO feedback (student_id, content_id, layer, signal, understood, ts) \
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(student_id)
    .bind(content_id)
    .bind(i64::from(layer))
    .bind(signal.as_str())
    .bind(understood)
    .bind(created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(FeedbackEvent {
        id: done.last_insert_rowid(),
        student_id,
        content_id,
        layer,
        signal,
        understood,
        created_at,
    })
}

/// Appends one graded quiz attempt
pub async fn append_quiz_attempt(
    pool: &SqlitePool,
    student_id: i64,
    content_id: i64,
    layer: Layer,
    question: &QuizQuestion,
    user_answer: &str,
) -> AppResult<QuizAttempt> {
    let options = serde_json::to_string(&question.options)
        .map_err(|e| AppError::Internal(format!("failed to encode quiz options: {}", e)))?;
    let is_correct = question.is_correct(user_answer);
    let user_answer = user_answer.trim().to_string();

    let mut tx = pool.begin().await?;
    ensure_owned(&mut tx, content_id, student_id).await?;

    let created_at = Utc::now();
    let done = sqlx::query(
        "INSERT INTO quiz (student_id, content_id, layer, question, options, correct_answer, \
         user_answer, is_correct, ts) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(student_id)
    .bind(content_id)
    .bind(i64::from(layer))
    .bind(&question.question)
    .bind(&options)
    .bind(&question.answer)
    .bind(&user_answer)
    .bind(is_correct)
    .bind(created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(QuizAttempt {
        id: done.last_insert_rowid(),
        student_id,
        content_id,
        layer,
        question: question.question.clone(),
        options: question.options.clone(),
        correct_answer: question.answer.clone(),
        user_answer,
        is_correct,
        created_at,
    })
}

/// Every feedback event a student has recorded, across all of their content
pub async fn feedback_for_student(
    pool: &SqlitePool,
    student_id: i64,
) -> AppResult<Vec<FeedbackEvent>> {
    sqlx::query_as::<_, FeedbackRow>(
        "SELECT id, student_id, content_id, layer, signal, understood, ts \
         FROM feedback WHERE student_id = ? ORDER BY id",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(FeedbackEvent::try_from)
    .collect()
}

/// Every quiz attempt a student has recorded, across all of their content
pub async fn quiz_attempts_for_student(
    pool: &SqlitePool,
    student_id: i64,
) -> AppResult<Vec<QuizAttempt>> {
    sqlx::query_as::<_, QuizRow>(
        "SELECT id, student_id, content_id, layer, question, options, correct_answer, \
         user_answer, is_correct, ts FROM quiz WHERE student_id = ? ORDER BY id",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(QuizAttempt::try_from)
    .collect()
}

/// Feedback for one content item, newest first
pub async fn feedback_history(
    pool: &SqlitePool,
    student_id: i64,
    content_id: i64,
) -> AppResult<Vec<FeedbackEvent>> {
    sqlx::query_as::<_, FeedbackRow>(
        "SELECT id, student_id, content_id, layer, signal, understood, ts \
         FROM feedback WHERE student_id = ? AND content_id = ? ORDER BY id DESC",
    )
    .bind(student_id)
    .bind(content_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(FeedbackEvent::try_from)
    .collect()
}

/// Quiz attempts for one content item, newest first
pub async fn quiz_history(
    pool: &SqlitePool,
    student_id: i64,
    content_id: i64,
) -> AppResult<Vec<QuizAttempt>> {
    sqlx::query_as::<_, QuizRow>(
        "SELECT id, student_id, content_id, layer, question, options, correct_answer, \
         user_answer, is_correct, ts FROM quiz WHERE student_id = ? AND content_id = ? \
         ORDER BY id DESC",
    )
    .bind(student_id)
    .bind(content_id)
    .fetch_all(pool)
    .await?
    .into_iter()
    .map(QuizAttempt::try_from)
    .collect()
}
