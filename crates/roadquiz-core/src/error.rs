//! Quiz error types.
//!
//! Every variant describes a rejected operation. None of them is fatal:
//! the engine leaves its state untouched whenever it returns one.

use thiserror::Error;

/// Errors returned by quiz engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// `go_next` was called before the current question was locked.
    #[error("answer required before moving to the next question")]
    AnswerRequired,

    /// `finish` was called before every question was answered.
    #[error("quiz incomplete: {answered} of {total} questions answered")]
    Incomplete { answered: usize, total: usize },

    /// `show_review` was called with no wrong answers.
    #[error("nothing to review: no wrong answers")]
    NothingToReview,

    /// The selected option does not exist for the current question.
    #[error("option {option} out of range, question has {options} options")]
    OptionOutOfRange { option: usize, options: usize },

    /// The operation needs a quiz in progress.
    #[error("quiz is not in progress")]
    NotInProgress,

    /// The operation needs a finished quiz.
    #[error("quiz has not finished yet")]
    NotFinished,

    /// The question bank has no questions.
    #[error("question bank is empty")]
    EmptyBank,

    /// A question violates the model invariants.
    #[error("invalid question {id}: {reason}")]
    InvalidQuestion { id: u32, reason: String },
}
