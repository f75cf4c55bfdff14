// src/analytics.rs

//! Performance analytics over a student's quiz attempts.
//!
//! Everything here is a pure function of the attempts and the question
//! lookup handed in. Callers recompute from scratch whenever the inputs or the
//! selected dimension change.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    config::{
        RADAR_LIMIT, RADAR_MIN_ANSWERS, RECOMMENDATION_LIMIT, RECOMMENDATION_MIN_ANSWERS,
        UNKNOWN_GROUP,
    },
    error::AppError,
    models::{
        attempt::{AnswerRecord, QuizAttempt, TimeWindow},
        question::{Question, QuestionTags},
    },
};

/// A tag axis answers can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    ExamType,
    Subject,
    Chapter,
    Topic,
    QuestionType,
    Source,
    DifficultyLevel,
}

impl Dimension {
    pub const ALL: [Dimension; 7] = [
        Dimension::ExamType,
        Dimension::Subject,
        Dimension::Chapter,
        Dimension::Topic,
        Dimension::QuestionType,
        Dimension::Source,
        Dimension::DifficultyLevel,
    ];

    /// Wire name, as used in query strings and tag records.
    pub fn key(&self) -> &'static str {
        match self {
            Dimension::ExamType => "exam_type",
            Dimension::Subject => "subject",
            Dimension::Chapter => "chapter",
            Dimension::Topic => "topic",
            Dimension::QuestionType => "question_type",
            Dimension::Source => "source",
            Dimension::DifficultyLevel => "difficulty_level",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Dimension::ExamType => "Exam Type",
            Dimension::Subject => "Subject",
            Dimension::Chapter => "Chapter",
            Dimension::Topic => "Topic",
            Dimension::QuestionType => "Question Type",
            Dimension::Source => "Source",
            Dimension::DifficultyLevel => "Difficulty",
        }
    }

    /// Reads this dimension's value from a tag set. Blank values count as absent.
    pub fn value<'a>(&self, tags: &'a QuestionTags) -> Option<&'a str> {
        let value = match self {
            Dimension::ExamType => tags.exam_type.as_deref(),
            Dimension::Subject => tags.subject.as_deref(),
            Dimension::Chapter => tags.chapter.as_deref(),
            Dimension::Topic => tags.topic.as_deref(),
            Dimension::QuestionType => tags.question_type.as_deref(),
            Dimension::Source => tags.source.as_deref(),
            Dimension::DifficultyLevel => tags.difficulty_level.map(|d| d.as_str()),
        };
        value.filter(|v| !v.trim().is_empty())
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Dimension {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dimension::ALL
            .into_iter()
            .find(|d| d.key() == s)
            .ok_or_else(|| AppError::BadRequest(format!("Unknown dimension '{}'", s)))
    }
}

/// How far back the dashboard looks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeframe {
    Week,
    Month,
    Quarter,
    Year,
    #[default]
    All,
}

impl Timeframe {
    pub fn window(&self, now: DateTime<Utc>) -> TimeWindow {
        let days = match self {
            Timeframe::Week => 7,
            Timeframe::Month => 30,
            Timeframe::Quarter => 90,
            Timeframe::Year => 365,
            Timeframe::All => return TimeWindow::default(),
        };
        TimeWindow {
            from: Some(now - Duration::days(days)),
            to: Some(now),
        }
    }
}

/// Rounds half up to one decimal place.
pub fn round_one_decimal(x: f64) -> f64 {
    ((10.0 * x) + 0.5).floor() / 10.0
}

/// Percentage of `part` in `whole`, one decimal. Zero when `whole` is zero.
fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        round_one_decimal(part / whole * 100.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AccuracyStats {
    pub total: usize,
    pub correct: usize,
    pub incorrect: usize,
    /// Not observable from attempt records; always 0.
    pub unattempted: usize,
    pub accuracy: f64,
}

impl AccuracyStats {
    fn from_counts(total: usize, correct: usize) -> Self {
        Self {
            total,
            correct,
            incorrect: total - correct,
            unattempted: 0,
            accuracy: percentage(correct as f64, total as f64),
        }
    }

    pub fn of<'a>(answers: impl IntoIterator<Item = &'a AnswerRecord>) -> Self {
        let (total, correct) = answers
            .into_iter()
            .fold((0, 0), |(t, c), a| (t + 1, c + usize::from(a.is_correct)));
        Self::from_counts(total, correct)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub name: String,
    #[serde(flatten)]
    pub stats: AccuracyStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub area: String,
    pub dimension: String,
    pub accuracy: f64,
    pub suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: DateTime<Utc>,
    pub accuracy: f64,
    pub score: f64,
    pub max_score: f64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarPoint {
    pub label: String,
    pub accuracy: f64,
}

/// Everything the analytics page renders for one dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub dimension: Dimension,
    pub dimension_label: String,
    pub overall: AccuracyStats,
    pub groups: Vec<GroupStats>,
    pub recommendations: Vec<Recommendation>,
    pub trend: Vec<TrendPoint>,
    pub radar: Vec<RadarPoint>,
}

/// Groups every answer of every attempt by the question's tag value.
///
/// Answers whose question is missing from `questions`, or whose tag is unset,
/// land in the "Unknown" group. The result is sorted by answer count, largest
/// first; equal counts keep the order in which groups were first seen.
pub fn group_by_dimension(
    attempts: &[QuizAttempt],
    questions: &HashMap<i64, Question>,
    dimension: Dimension,
) -> Vec<GroupStats> {
    let mut order: Vec<(String, usize, usize)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for answer in attempts.iter().flat_map(|a| a.answers.iter()) {
        let name = questions
            .get(&answer.question_id)
            .and_then(|q| dimension.value(&q.tags))
            .unwrap_or(UNKNOWN_GROUP);

        let slot = match index.get(name) {
            Some(&i) => i,
            None => {
                index.insert(name.to_string(), order.len());
                order.push((name.to_string(), 0, 0));
                order.len() - 1
            }
        };
        let entry = &mut order[slot];
        entry.1 += 1;
        if answer.is_correct {
            entry.2 += 1;
        }
    }

    let mut groups: Vec<GroupStats> = order
        .into_iter()
        .map(|(name, total, correct)| GroupStats {
            name,
            stats: AccuracyStats::from_counts(total, correct),
        })
        .collect();
    groups.sort_by(|a, b| b.stats.total.cmp(&a.stats.total));
    groups
}

/// Accuracy over all answers, regardless of dimension.
pub fn overall_stats(attempts: &[QuizAttempt]) -> AccuracyStats {
    AccuracyStats::of(attempts.iter().flat_map(|a| a.answers.iter()))
}

fn suggestion_for(area: &str, dimension: Dimension, accuracy: f64) -> String {
    let label = dimension.label().to_lowercase();
    if accuracy < 40.0 {
        format!(
            "Revisit the fundamentals of {} before attempting more questions from this {}.",
            area, label
        )
    } else if accuracy < 70.0 {
        format!(
            "Practice more {} questions to build consistency; review each mistake.",
            area
        )
    } else {
        format!(
            "Review the few questions you missed in {} to push accuracy higher.",
            area
        )
    }
}

/// The weakest groups with enough answers to be meaningful, weakest first.
pub fn recommendations(groups: &[GroupStats], dimension: Dimension) -> Vec<Recommendation> {
    let mut candidates: Vec<&GroupStats> = groups
        .iter()
        .filter(|g| g.stats.total >= RECOMMENDATION_MIN_ANSWERS)
        .collect();
    candidates.sort_by(|a, b| {
        a.stats
            .accuracy
            .partial_cmp(&b.stats.accuracy)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    candidates
        .into_iter()
        .take(RECOMMENDATION_LIMIT)
        .map(|g| Recommendation {
            area: g.name.clone(),
            dimension: dimension.label().to_string(),
            accuracy: g.stats.accuracy,
            suggestion: suggestion_for(&g.name, dimension, g.stats.accuracy),
        })
        .collect()
}

/// One point per attempt, oldest first.
pub fn time_trend(attempts: &[QuizAttempt]) -> Vec<TrendPoint> {
    let mut sorted: Vec<&QuizAttempt> = attempts.iter().collect();
    sorted.sort_by_key(|a| a.submitted_at);

    sorted
        .into_iter()
        .map(|a| TrendPoint {
            date: a.submitted_at,
            accuracy: percentage(a.score, a.max_score),
            score: a.score,
            max_score: a.max_score,
            title: a.quiz.title.clone(),
        })
        .collect()
}

/// Radar axes: groups with at least a few answers, capped for readability.
/// Expects `groups` already sorted by `group_by_dimension`.
pub fn radar(groups: &[GroupStats]) -> Vec<RadarPoint> {
    groups
        .iter()
        .filter(|g| g.stats.total >= RADAR_MIN_ANSWERS)
        .take(RADAR_LIMIT)
        .map(|g| RadarPoint {
            label: g.name.clone(),
            accuracy: g.stats.accuracy,
        })
        .collect()
}

pub fn build_dashboard(
    attempts: &[QuizAttempt],
    questions: &HashMap<i64, Question>,
    dimension: Dimension,
) -> Dashboard {
    let groups = group_by_dimension(attempts, questions, dimension);
    Dashboard {
        dimension,
        dimension_label: dimension.label().to_string(),
        overall: overall_stats(attempts),
        recommendations: recommendations(&groups, dimension),
        trend: time_trend(attempts),
        radar: radar(&groups),
        groups,
    }
}
