// src/models/question.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Question difficulty as tagged in the question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

/// Tag set attached to every question.
/// Each field is one analytics dimension; absent tags are `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionTags {
    #[serde(default)]
    pub exam_type: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub question_type: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub difficulty_level: Option<Difficulty>,
}

/// A question from the backend question bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// The text content of the question (may contain markup or math).
    pub text: String,

    #[serde(default)]
    pub options: Vec<String>,

    #[serde(default)]
    pub correct_answers: Vec<String>,

    /// Explanation shown after the attempt is graded.
    #[serde(default)]
    pub explanation: Option<String>,

    #[serde(default)]
    pub tags: QuestionTags,
}

/// DTO for creating or updating a question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    #[validate(custom(function = validate_options))]
    pub options: Vec<String>,
    #[validate(length(min = 1))]
    pub correct_answers: Vec<String>,
    #[validate(length(max = 5000))]
    pub explanation: Option<String>,
    #[serde(default)]
    pub tags: QuestionTags,
}

/// Query parameters for browsing the question bank.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestionListParams {
    pub subject: Option<String>,
    pub chapter: Option<String>,
    pub topic: Option<String>,
    pub difficulty_level: Option<Difficulty>,
    pub q: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

fn validate_options(options: &[String]) -> Result<(), validator::ValidationError> {
    if options.is_empty() {
        return Err(validator::ValidationError::new("options_cannot_be_empty"));
    }
    for opt in options {
        if opt.len() > 1000 {
            return Err(validator::ValidationError::new("option_too_long"));
        }
    }
    Ok(())
}
