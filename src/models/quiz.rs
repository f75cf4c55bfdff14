// src/models/quiz.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::question::Question;

/// A question placed inside a section, with the marks it is worth there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionQuestion {
    pub question: Question,
    pub marks: u32,
}

/// Per-section countdown. `duration` is in minutes and is `None` while disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionTimer {
    pub enabled: bool,
    pub duration: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub questions: Vec<SectionQuestion>,
    #[serde(default)]
    pub timer: SectionTimer,
}

/// Availability window of a quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub is_scheduled: bool,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl Schedule {
    /// Whether the quiz can be taken at `now`.
    ///
    /// Unscheduled quizzes are always available. A scheduled quiz with a
    /// missing bound or an inverted window is never available.
    pub fn is_available(&self, now: DateTime<Utc>) -> bool {
        if !self.is_scheduled {
            return true;
        }
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= now && now <= end,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    pub enabled: bool,
    #[serde(default)]
    pub text: String,
}

/// The quiz aggregate as submitted to and returned by the backend.
///
/// `total_duration` (minutes) and `total_marks` are derived from `sections`;
/// build quizzes through `QuizComposer` to keep them consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub header: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub footer: Vec<String>,
    #[serde(default)]
    pub sections: Vec<QuizSection>,
    /// Quiz-wide limit used when no section carries its own timer.
    #[serde(default)]
    pub time_limit: Option<u32>,
    pub total_duration: u32,
    pub total_marks: u32,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub watermark: Watermark,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lightweight listing row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSummary {
    pub id: i64,
    pub title: String,
    pub total_duration: u32,
    pub total_marks: u32,
    #[serde(default)]
    pub schedule: Schedule,
    pub created_at: Option<DateTime<Utc>>,
}

/// A question reference inside a draft section.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DraftQuestion {
    pub question_id: i64,
    #[validate(range(max = 1000))]
    pub marks: Option<u32>,
}

/// A section as edited in the UI form.
///
/// `duration` is the raw text of the minutes input; it is coerced, never rejected.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DraftSection {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    #[validate(nested)]
    pub questions: Vec<DraftQuestion>,
    #[serde(default)]
    pub timer_enabled: bool,
    #[serde(default)]
    pub duration: Option<String>,
}

/// DTO for creating or updating a quiz from the composer form.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct QuizDraft {
    #[validate(length(min = 1, max = 200, message = "Title length must be between 1 and 200 chars"))]
    pub title: String,
    #[serde(default)]
    pub header: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub footer: Vec<String>,
    #[serde(default)]
    #[validate(nested)]
    pub sections: Vec<DraftSection>,
    #[serde(default)]
    pub time_limit: Option<String>,
    #[serde(default)]
    pub schedule: Schedule,
    #[serde(default)]
    pub watermark: Watermark,
}

impl QuizDraft {
    /// Every question id referenced by the draft, in order of appearance.
    pub fn question_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = Vec::new();
        for section in &self.sections {
            for q in &section.questions {
                if !ids.contains(&q.question_id) {
                    ids.push(q.question_id);
                }
            }
        }
        ids
    }
}
