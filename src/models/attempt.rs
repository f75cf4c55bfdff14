// src/models/attempt.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to the quiz an attempt was made against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizRef {
    pub id: i64,
    pub title: String,
}

/// One graded answer inside an attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: i64,
    #[serde(default)]
    pub selected_answers: Vec<String>,
    #[serde(default)]
    pub correct_answers: Vec<String>,
    pub is_correct: bool,
}

/// A completed, scored submission of a quiz. Read-only on this side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttempt {
    pub id: i64,
    pub quiz: QuizRef,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
    pub score: f64,
    pub max_score: f64,
    pub submitted_at: DateTime<Utc>,
}

/// Inclusive fetch window for attempts. Open bounds are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}
