use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;

use super::Layer;
use crate::error::AppError;

/// A lettered answer choice, e.g. `B) Chlorophyll`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizOption {
    pub label: String,
    pub text: String,
}

/// A generated multiple-choice question
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<QuizOption>,
    /// Label of the correct option
    pub answer: String,
}

impl QuizQuestion {
    /// Answers are compared by option label, ignoring case and surrounding space
    pub fn is_correct(&self, submitted: &str) -> bool {
        submitted.trim().eq_ignore_ascii_case(&self.answer)
    }
}

/// One entry of the append-only quiz log
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct QuizAttempt {
    pub id: i64,
    pub student_id: i64,
    pub content_id: i64,
    pub layer: Layer,
    pub question: String,
    pub options: Vec<QuizOption>,
    pub correct_answer: String,
    pub user_answer: String,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
}

/// Row shape of the `quiz` table; options are stored as a JSON array
#[derive(Debug, FromRow)]
pub struct QuizRow {
    pub id: i64,
    pub student_id: i64,
    pub content_id: i64,
    pub layer: i64,
    pub question: String,
    pub options: String,
    pub correct_answer: String,
    pub user_answer: String,
    pub is_correct: bool,
    pub ts: DateTime<Utc>,
}

impl TryFrom<QuizRow> for QuizAttempt {
    type Error = AppError;

    fn try_from(row: QuizRow) -> Result<Self, Self::Error> {
        let options = serde_json::from_str(&row.options)
            .map_err(|e| AppError::Internal(format!("corrupt quiz options: {}", e)))?;

        Ok(QuizAttempt {
            id: row.id,
            student_id: row.student_id,
            content_id: row.content_id,
            layer: Layer::try_from(row.layer)?,
            question: row.question,
            options,
            correct_answer: row.correct_answer,
            user_answer: row.user_answer,
            is_correct: row.is_correct,
            created_at: row.ts,
        })
    }
}
