use serde::Serialize;
use sqlx::SqlitePool;
use std::collections::HashMap;

use crate::{
    db::{content, events},
    error::{AppError, AppResult},
    models::{Content, FeedbackEvent, QuizAttempt},
};

/// Mastery metrics for one (student, content) pair
///
/// Always computed from the full current event log; nothing is cached.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MasteryMetrics {
    pub interactions: usize,
    pub understood_count: usize,
    /// `understood_count / interactions`, or exactly 0 with no interactions
    pub mastery_score: f64,
    /// Mean quiz correctness; `None` means no attempts yet
    pub avg_quiz_accuracy: Option<f64>,
}

impl MasteryMetrics {
    pub fn compute<'a>(
        feedback: impl IntoIterator<Item = &'a FeedbackEvent>,
        quiz: impl IntoIterator<Item = &'a QuizAttempt>,
    ) -> Self {
        let (interactions, understood_count) = feedback
            .into_iter()
            .fold((0, 0), |(total, understood), event| {
                (total + 1, understood + usize::from(event.understood))
            });

        let (attempts, correct) = quiz.into_iter().fold((0, 0), |(total, correct), attempt| {
            (total + 1, correct + usize::from(attempt.is_correct))
        });

        let mastery_score = if interactions == 0 {
            0.0
        } else {
            round2(understood_count as f64 / interactions as f64)
        };

        let avg_quiz_accuracy = (attempts > 0).then(|| round2(correct as f64 / attempts as f64));

        Self {
            interactions,
            understood_count,
            mastery_score,
            avg_quiz_accuracy,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One dashboard row
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ContentSummary {
    pub content_id: i64,
    pub snippet: String,
    #[serde(flatten)]
    pub metrics: MasteryMetrics,
}

/// Feedback and quiz history for one content item, newest first
#[derive(Debug, Clone, Serialize)]
pub struct ContentHistory {
    pub content_id: i64,
    pub metrics: MasteryMetrics,
    pub feedback: Vec<FeedbackEvent>,
    pub quiz: Vec<QuizAttempt>,
}

/// Builds the dashboard for a student: every owned content item, newest first
pub async fn dashboard(pool: &SqlitePool, student_id: i64) -> AppResult<Vec<ContentSummary>> {
    let contents = content::list_for_student(pool, student_id).await?;

    let mut feedback_by_content: HashMap<i64, Vec<FeedbackEvent>> = HashMap::new();
    for event in events::feedback_for_student(pool, student_id).await? {
        feedback_by_content.entry(event.content_id).or_default().push(event);
    }

    let mut quiz_by_content: HashMap<i64, Vec<QuizAttempt>> = HashMap::new();
    for attempt in events::quiz_attempts_for_student(pool, student_id).await? {
        quiz_by_content.entry(attempt.content_id).or_default().push(attempt);
    }

    let summaries = contents
        .iter()
        .map(|content: &Content| ContentSummary {
            content_id: content.id,
            snippet: content.snippet(),
            metrics: MasteryMetrics::compute(
                feedback_by_content.get(&content.id).into_iter().flatten(),
                quiz_by_content.get(&content.id).into_iter().flatten(),
            ),
        })
        .collect();

    Ok(summaries)
}

/// Loads the history of one content item owned by the student
pub async fn history(
    pool: &SqlitePool,
    student_id: i64,
    content_id: i64,
) -> AppResult<ContentHistory> {
    content::find_owned(pool, content_id, student_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("content {}", content_id)))?;

    let feedback = events::feedback_history(pool, student_id, content_id).await?;
    let quiz = events::quiz_history(pool, student_id, content_id).await?;
    let metrics = MasteryMetrics::compute(&feedback, &quiz);

    Ok(ContentHistory {
        content_id,
        metrics,
        feedback,
        quiz,
    })
}
