use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use std::{fmt::Display, str::FromStr};

use super::Layer;
use crate::error::AppError;

/// Feedback a student gives on the layer they are reading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackSignal {
    TooSimple,
    Understood,
    TooComplex,
}

impl FeedbackSignal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackSignal::TooSimple => "too_simple",
            FeedbackSignal::Understood => "understood",
            FeedbackSignal::TooComplex => "too_complex",
        }
    }

    pub fn is_understood(&self) -> bool {
        matches!(self, FeedbackSignal::Understood)
    }
}

impl Display for FeedbackSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedbackSignal {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "too_simple" => Ok(FeedbackSignal::TooSimple),
            "understood" => Ok(FeedbackSignal::Understood),
            "too_complex" => Ok(FeedbackSignal::TooComplex),
            other => Err(AppError::Internal(format!("unknown feedback signal '{}'", other))),
        }
    }
}

/// One entry of the append-only feedback log
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedbackEvent {
    pub id: i64,
    pub student_id: i64,
    pub content_id: i64,
    pub layer: Layer,
    pub signal: FeedbackSignal,
    pub understood: bool,
    pub created_at: DateTime<Utc>,
}

/// Row shape of the `feedback` table
#[derive(Debug, FromRow)]
pub struct FeedbackRow {
    pub id: i64,
    pub student_id: i64,
    pub content_id: i64,
    pub layer: i64,
    pub signal: String,
    pub understood: bool,
    pub ts: DateTime<Utc>,
}

impl TryFrom<FeedbackRow> for FeedbackEvent {
    type Error = AppError;

    fn try_from(row: FeedbackRow) -> Result<Self, Self::Error> {
        Ok(FeedbackEvent {
            id: row.id,
            student_id: row.student_id,
            content_id: row.content_id,
            layer: Layer::try_from(row.layer)?,
            signal: row.signal.parse()?,
            understood: row.understood,
            created_at: row.ts,
        })
    }
}
