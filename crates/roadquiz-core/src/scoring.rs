//! Scoring: correct counts, percentages, result bands, and the review set.
//!
//! Percentages use round-half-up on non-negative values, so 2 of 3
//! scores 67 and 1 of 8 (12.5) scores 13.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Question;

/// Count the answers that match their question's correct option.
///
/// Unanswered slots never count. `answers` is expected to have one slot
/// per question; extra slots on either side are ignored.
pub fn count_correct(questions: &[Question], answers: &[Option<usize>]) -> usize {
    questions
        .iter()
        .zip(answers)
        .filter(|(q, a)| a.is_some_and(|a| q.is_correct(a)))
        .count()
}

/// Compute `round(100 * correct / total)` with half-up rounding.
///
/// Returns 0 when `total` is 0.
pub fn percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct.min(total) as u64;
    let total = total as u64;
    // (100c / t + 1/2) floored, kept in integers
    ((200 * correct + total) / (2 * total)) as u32
}

/// Fixed result band derived from the percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultBand {
    Excellent,
    Good,
    Satisfactory,
    NeedsReview,
}

impl ResultBand {
    pub fn from_percentage(percentage: u32) -> Self {
        if percentage >= 90 {
            ResultBand::Excellent
        } else if percentage >= 70 {
            ResultBand::Good
        } else if percentage >= 50 {
            ResultBand::Satisfactory
        } else {
            ResultBand::NeedsReview
        }
    }

    /// Message shown on the result screen.
    pub fn message(&self) -> &'static str {
        match self {
            ResultBand::Excellent => {
                "Excellent result! You know the speed rules very well."
            }
            ResultBand::Good => "Good result. Consider going over the tricky points again.",
            ResultBand::Satisfactory => {
                "Satisfactory result. Some additional preparation is needed."
            }
            ResultBand::NeedsReview => {
                "Serious preparation is required. Study the theory again."
            }
        }
    }
}

impl fmt::Display for ResultBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultBand::Excellent => write!(f, "excellent"),
            ResultBand::Good => write!(f, "good"),
            ResultBand::Satisfactory => write!(f, "satisfactory"),
            ResultBand::NeedsReview => write!(f, "needs review"),
        }
    }
}

/// A wrong or missing answer paired with the correct one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    /// Position of the question in the bank.
    pub index: usize,
    /// The question itself.
    pub question: Question,
    /// The option the user picked, if any.
    pub selected: Option<usize>,
    /// The correct option.
    pub correct: usize,
}

impl ReviewEntry {
    /// Text of the user's answer, or `None` if the question was skipped.
    pub fn selected_text(&self) -> Option<&str> {
        self.selected.and_then(|s| self.question.option_text(s))
    }

    pub fn correct_text(&self) -> &str {
        self.question.correct_text()
    }
}

/// Build review entries for every question whose recorded answer differs
/// from the correct option, in question order.
pub fn build_review(questions: &[Question], answers: &[Option<usize>]) -> Vec<ReviewEntry> {
    questions
        .iter()
        .enumerate()
        .filter_map(|(index, q)| {
            let selected = answers.get(index).copied().flatten();
            if selected == Some(q.correct) {
                return None;
            }
            Some(ReviewEntry {
                index,
                question: q.clone(),
                selected,
                correct: q.correct,
            })
        })
        .collect()
}

/// Everything the result screen and result stores need after a finish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub correct_count: usize,
    pub total_questions: usize,
    pub percentage: u32,
    pub elapsed_secs: u64,
    pub band: ResultBand,
    /// Whether the countdown, rather than the user, ended the quiz.
    pub timed_out: bool,
    pub review_entries: Vec<ReviewEntry>,
}

impl QuizOutcome {
    /// Score a finished attempt.
    pub fn compute(
        questions: &[Question],
        answers: &[Option<usize>],
        elapsed_secs: u64,
        timed_out: bool,
    ) -> Self {
        let correct_count = count_correct(questions, answers);
        let total_questions = questions.len();
        let percentage = percentage(correct_count, total_questions);
        Self {
            correct_count,
            total_questions,
            percentage,
            elapsed_secs,
            band: ResultBand::from_percentage(percentage),
            timed_out,
            review_entries: build_review(questions, answers),
        }
    }

    pub fn wrong_count(&self) -> usize {
        self.total_questions - self.correct_count
    }

    pub fn has_mistakes(&self) -> bool {
        !self.review_entries.is_empty()
    }
}
