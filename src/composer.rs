// src/composer.rs

//! Quiz composition.
//!
//! `QuizComposer` owns a `Quiz` while it is being edited. Every mutation that
//! touches sections, questions or timers goes through `recompute`, so
//! `total_marks` and `total_duration` always reflect the current sections.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    config::{DEFAULT_QUESTION_MARKS, DEFAULT_SECTION_MINUTES},
    error::AppError,
    models::{
        question::Question,
        quiz::{Quiz, QuizDraft, QuizSection, Schedule, SectionQuestion, SectionTimer, Watermark},
    },
};

/// The three free-text note lists of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteList {
    Header,
    Instructions,
    Footer,
}

/// Parses a minutes input field.
///
/// Floors to a non-negative integer. Anything unparsable, negative or
/// non-finite becomes 0.
pub fn parse_minutes(input: &str) -> u32 {
    match input.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => v.floor().min(u32::MAX as f64) as u32,
        _ => 0,
    }
}

#[derive(Debug, Clone)]
pub struct QuizComposer {
    quiz: Quiz,
}

impl QuizComposer {
    pub fn new(title: &str) -> Self {
        Self {
            quiz: Quiz {
                id: None,
                title: title.trim().to_string(),
                header: Vec::new(),
                instructions: Vec::new(),
                footer: Vec::new(),
                sections: Vec::new(),
                time_limit: None,
                total_duration: 0,
                total_marks: 0,
                schedule: Schedule::default(),
                watermark: Watermark::default(),
                created_at: None,
                updated_at: None,
            },
        }
    }

    /// Starts editing an existing quiz.
    ///
    /// The stored schedule is kept as-is, even if its window is inverted.
    /// Totals are recomputed from the stored sections.
    pub fn from_quiz(quiz: Quiz) -> Self {
        let mut composer = Self { quiz };
        composer.recompute();
        composer
    }

    /// Replays a submitted form through the composer.
    ///
    /// `questions` must contain every id the draft references; a missing one is
    /// a bad request since the form can only offer questions from the bank.
    pub fn from_draft(
        draft: &QuizDraft,
        questions: &HashMap<i64, Question>,
    ) -> Result<Self, AppError> {
        let mut composer = Self::new(&draft.title);

        for text in &draft.header {
            composer.add_note(NoteList::Header, text);
        }
        for text in &draft.instructions {
            composer.add_note(NoteList::Instructions, text);
        }
        for text in &draft.footer {
            composer.add_note(NoteList::Footer, text);
        }

        for (index, section) in draft.sections.iter().enumerate() {
            composer.add_section(&section.name);
            for item in &section.questions {
                let question = questions.get(&item.question_id).ok_or_else(|| {
                    AppError::BadRequest(format!("Question {} does not exist", item.question_id))
                })?;
                composer.add_question(index, question.clone(), item.marks)?;
            }
            if section.timer_enabled {
                composer.set_section_timer(index, true)?;
                if let Some(raw) = &section.duration {
                    composer.set_section_duration(index, raw)?;
                }
            }
        }

        composer.set_time_limit(draft.time_limit.as_deref());
        composer.set_scheduled(draft.schedule.is_scheduled);
        composer.set_start_date(draft.schedule.start_date);
        composer.set_end_date(draft.schedule.end_date);
        composer.set_watermark(draft.watermark.enabled, &draft.watermark.text);

        Ok(composer)
    }

    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    pub fn set_title(&mut self, title: &str) {
        self.quiz.title = title.trim().to_string();
    }

    pub fn notes(&self, list: NoteList) -> &[String] {
        match list {
            NoteList::Header => &self.quiz.header,
            NoteList::Instructions => &self.quiz.instructions,
            NoteList::Footer => &self.quiz.footer,
        }
    }

    fn notes_mut(&mut self, list: NoteList) -> &mut Vec<String> {
        match list {
            NoteList::Header => &mut self.quiz.header,
            NoteList::Instructions => &mut self.quiz.instructions,
            NoteList::Footer => &mut self.quiz.footer,
        }
    }

    /// Appends a trimmed note. Blank input is ignored and returns `false`.
    pub fn add_note(&mut self, list: NoteList, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.notes_mut(list).push(text.to_string());
        true
    }

    pub fn remove_note(&mut self, list: NoteList, index: usize) -> Option<String> {
        let notes = self.notes_mut(list);
        if index < notes.len() {
            Some(notes.remove(index))
        } else {
            None
        }
    }

    /// Appends an empty, untimed section and returns its generated id.
    pub fn add_section(&mut self, name: &str) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        self.quiz.sections.push(QuizSection {
            id: id.clone(),
            name: name.trim().to_string(),
            questions: Vec::new(),
            timer: SectionTimer::default(),
        });
        self.recompute();
        id
    }

    pub fn rename_section(&mut self, index: usize, name: &str) -> Result<(), AppError> {
        self.section_mut(index)?.name = name.trim().to_string();
        Ok(())
    }

    pub fn remove_section(&mut self, index: usize) -> Result<QuizSection, AppError> {
        self.section_mut(index)?;
        let removed = self.quiz.sections.remove(index);
        self.recompute();
        Ok(removed)
    }

    pub fn move_section(&mut self, from: usize, to: usize) -> Result<(), AppError> {
        self.section_mut(from)?;
        self.section_mut(to)?;
        let section = self.quiz.sections.remove(from);
        self.quiz.sections.insert(to, section);
        Ok(())
    }

    /// Appends a question to a section. `marks` defaults to one mark.
    pub fn add_question(
        &mut self,
        section: usize,
        question: Question,
        marks: Option<u32>,
    ) -> Result<(), AppError> {
        let marks = marks.unwrap_or(DEFAULT_QUESTION_MARKS);
        self.section_mut(section)?
            .questions
            .push(SectionQuestion { question, marks });
        self.recompute();
        Ok(())
    }

    pub fn remove_question(
        &mut self,
        section: usize,
        position: usize,
    ) -> Result<SectionQuestion, AppError> {
        let questions = &mut self.section_mut(section)?.questions;
        if position >= questions.len() {
            return Err(AppError::NotFound(format!(
                "Question {} not found in section {}",
                position, section
            )));
        }
        let removed = questions.remove(position);
        self.recompute();
        Ok(removed)
    }

    pub fn set_question_marks(
        &mut self,
        section: usize,
        position: usize,
        marks: u32,
    ) -> Result<(), AppError> {
        let item = self
            .section_mut(section)?
            .questions
            .get_mut(position)
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Question {} not found in section {}",
                    position, section
                ))
            })?;
        item.marks = marks;
        self.recompute();
        Ok(())
    }

    /// Switches a section timer on or off.
    ///
    /// Enabling keeps an existing duration or falls back to the default.
    /// Disabling clears the duration.
    pub fn set_section_timer(&mut self, section: usize, enabled: bool) -> Result<(), AppError> {
        let timer = &mut self.section_mut(section)?.timer;
        timer.enabled = enabled;
        timer.duration = if enabled {
            Some(timer.duration.unwrap_or(DEFAULT_SECTION_MINUTES))
        } else {
            None
        };
        self.recompute();
        Ok(())
    }

    /// Sets a section duration from raw input. Ignored while the timer is off.
    pub fn set_section_duration(&mut self, section: usize, input: &str) -> Result<(), AppError> {
        let timer = &mut self.section_mut(section)?.timer;
        if !timer.enabled {
            return Ok(());
        }
        timer.duration = Some(parse_minutes(input));
        self.recompute();
        Ok(())
    }

    /// Sets the quiz-wide limit. `None` or blank input clears it.
    pub fn set_time_limit(&mut self, input: Option<&str>) {
        self.quiz.time_limit = match input {
            Some(raw) if !raw.trim().is_empty() => Some(parse_minutes(raw)),
            _ => None,
        };
        self.recompute();
    }

    pub fn set_scheduled(&mut self, scheduled: bool) {
        self.quiz.schedule.is_scheduled = scheduled;
    }

    pub fn set_start_date(&mut self, start: Option<DateTime<Utc>>) {
        self.quiz.schedule.start_date = start;
    }

    /// Sets the end date, clamped so it is never before the current start.
    pub fn set_end_date(&mut self, end: Option<DateTime<Utc>>) {
        self.quiz.schedule.end_date = match (self.quiz.schedule.start_date, end) {
            (Some(start), Some(end)) if end < start => Some(start),
            (_, end) => end,
        };
    }

    pub fn set_watermark(&mut self, enabled: bool, text: &str) {
        self.quiz.watermark = Watermark {
            enabled,
            text: text.trim().to_string(),
        };
    }

    /// Checks the quiz is ready to submit.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.quiz.title.is_empty() {
            return Err(AppError::BadRequest("Quiz title is required".to_string()));
        }
        let schedule = &self.quiz.schedule;
        if schedule.is_scheduled && (schedule.start_date.is_none() || schedule.end_date.is_none()) {
            return Err(AppError::BadRequest(
                "Scheduled quizzes need both a start and an end date".to_string(),
            ));
        }
        Ok(())
    }

    /// Validates and hands out the composed quiz.
    pub fn build(self) -> Result<Quiz, AppError> {
        self.validate()?;
        Ok(self.quiz)
    }

    fn section_mut(&mut self, index: usize) -> Result<&mut QuizSection, AppError> {
        self.quiz
            .sections
            .get_mut(index)
            .ok_or_else(|| AppError::NotFound(format!("Section {} not found", index)))
    }

    fn recompute(&mut self) {
        let quiz = &mut self.quiz;
        quiz.total_marks = quiz
            .sections
            .iter()
            .flat_map(|s| s.questions.iter())
            .map(|q| q.marks)
            .sum();

        let timed: Vec<u32> = quiz
            .sections
            .iter()
            .filter(|s| s.timer.enabled)
            .map(|s| s.timer.duration.unwrap_or(0))
            .collect();
        quiz.total_duration = if timed.is_empty() {
            quiz.time_limit.unwrap_or(0)
        } else {
            timed.iter().sum()
        };
        tracing::debug!(
            "Recomputed quiz totals: {} marks, {} minutes",
            quiz.total_marks,
            quiz.total_duration
        );
    }
}
