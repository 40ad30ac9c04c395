//! Core data model types for roadquiz.
//!
//! These are the question and question-bank types that the engine,
//! parser, and presentation layer share. Questions are immutable once
//! loaded; the engine only ever borrows them read-only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::QuizError;

/// Minimum number of answer options a question must offer.
pub const MIN_OPTIONS: usize = 2;

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Positive identifier; questions are presented in bank order.
    pub id: u32,
    /// The question text.
    pub prompt: String,
    /// Optional path or URL of an illustration.
    #[serde(default)]
    pub image: Option<String>,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// 0-based index of the correct option.
    pub correct: usize,
}

impl Question {
    /// Returns `true` if `option` is the correct answer.
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct
    }

    /// Text of the correct option.
    pub fn correct_text(&self) -> &str {
        &self.options[self.correct]
    }

    /// Text of the given option, if it exists.
    pub fn option_text(&self, option: usize) -> Option<&str> {
        self.options.get(option).map(String::as_str)
    }

    /// Check the structural invariants the engine relies on.
    pub fn check(&self) -> Result<(), QuizError> {
        let invalid = |reason: String| QuizError::InvalidQuestion {
            id: self.id,
            reason,
        };
        if self.id == 0 {
            return Err(invalid("id must be positive".into()));
        }
        if self.options.len() < MIN_OPTIONS {
            return Err(invalid(format!(
                "needs at least {MIN_OPTIONS} options, has {}",
                self.options.len()
            )));
        }
        if self.correct >= self.options.len() {
            return Err(invalid(format!(
                "correct option {} out of range (0..{})",
                self.correct,
                self.options.len()
            )));
        }
        Ok(())
    }
}

/// Letter shown next to an option: 0 -> 'A', 1 -> 'B', ...
pub fn option_letter(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i))
        .unwrap_or('?')
}

/// A named, ordered collection of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    /// Unique identifier for this bank.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Description of the bank.
    #[serde(default)]
    pub description: String,
    /// Countdown budget override in seconds.
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
    /// The questions, in presentation order.
    #[serde(default)]
    pub questions: Vec<Question>,
}

impl QuestionBank {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Check every question, failing on the first broken one.
    pub fn check(&self) -> Result<(), QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        self.questions.iter().try_for_each(Question::check)
    }
}

impl fmt::Display for QuestionBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} questions)", self.name, self.questions.len())
    }
}
