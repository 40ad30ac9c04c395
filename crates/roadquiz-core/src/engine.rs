//! The speed-test quiz engine.
//!
//! `QuizEngine` is a synchronous state machine. It never schedules
//! anything itself: the owner calls [`QuizEngine::lock`] once the reveal
//! delay has passed and [`QuizEngine::tick`] once per second. Every
//! rejected operation leaves the state unchanged.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::Clock;
use crate::error::QuizError;
use crate::model::{Question, QuestionBank};
use crate::scoring::{percentage, QuizOutcome, ReviewEntry};

/// Default countdown budget: 20 minutes.
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 20 * 60;

/// Default delay between selecting an answer and revealing it.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_millis(500);

/// Remaining time at or below which the timer is shown as urgent.
pub const LOW_TIME_SECS: u64 = 60;

/// Configuration for a quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizEngineConfig {
    /// Countdown budget in seconds.
    pub time_limit_secs: u64,
    /// How long the owner waits before calling `lock()`.
    pub reveal_delay: Duration,
    /// Finish automatically once the last question is locked and every
    /// question has an answer.
    pub auto_finish: bool,
}

impl Default for QuizEngineConfig {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            auto_finish: false,
        }
    }
}

/// Session-level phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress,
    Finished,
    Reviewing,
}

/// Display status of the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    /// No answer recorded yet.
    ChooseAnswer,
    /// Answer recorded, waiting for the reveal.
    Pending,
    Correct,
    Incorrect,
}

/// Result of [`QuizEngine::select_answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// The answer was recorded; the owner should schedule `lock()`.
    Recorded(usize),
    /// The question is already locked; nothing changed.
    Ignored,
}

/// Result of [`QuizEngine::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Countdown still running with this many seconds left.
    Running(u64),
    /// This tick exhausted the countdown and finished the quiz.
    Expired,
    /// The quiz is not in progress; the tick was ignored.
    Idle,
}

/// State machine for one quiz attempt at a time.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    questions: Arc<[Question]>,
    config: QuizEngineConfig,
    clock: Clock,
    pointer: usize,
    answers: Vec<Option<usize>>,
    locked: bool,
    remaining_secs: u64,
    started_at: DateTime<Utc>,
    phase: Phase,
    outcome: Option<QuizOutcome>,
}

impl QuizEngine {
    /// Start a quiz over `questions`.
    ///
    /// Fails if there are no questions or any question breaks the model
    /// invariants.
    pub fn new(
        questions: impl Into<Arc<[Question]>>,
        config: QuizEngineConfig,
        clock: Clock,
    ) -> Result<Self, QuizError> {
        let questions = questions.into();
        if questions.is_empty() {
            return Err(QuizError::EmptyBank);
        }
        questions.iter().try_for_each(Question::check)?;

        let count = questions.len();
        let started_at = clock.now();
        tracing::debug!(questions = count, "quiz started");

        Ok(Self {
            questions,
            remaining_secs: config.time_limit_secs,
            config,
            clock,
            pointer: 0,
            answers: vec![None; count],
            locked: false,
            started_at,
            phase: Phase::InProgress,
            outcome: None,
        })
    }

    /// Start a quiz over a bank, honoring its time limit override.
    pub fn from_bank(
        bank: &QuestionBank,
        mut config: QuizEngineConfig,
        clock: Clock,
    ) -> Result<Self, QuizError> {
        if let Some(limit) = bank.time_limit_secs {
            config.time_limit_secs = limit;
        }
        Self::new(bank.questions.clone(), config, clock)
    }

    // -----------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------

    /// Record `option` for the current question.
    ///
    /// While the question is unlocked the answer may be changed freely.
    /// Once locked, further selections are ignored.
    pub fn select_answer(&mut self, option: usize) -> Result<SelectOutcome, QuizError> {
        self.ensure_in_progress()?;
        if self.locked {
            return Ok(SelectOutcome::Ignored);
        }
        let options = self.current_question().options.len();
        if option >= options {
            return Err(QuizError::OptionOutOfRange { option, options });
        }
        self.answers[self.pointer] = Some(option);
        tracing::debug!(question = self.pointer, option, "answer selected");
        Ok(SelectOutcome::Recorded(option))
    }

    /// Reveal and freeze the current question's answer.
    ///
    /// Returns whether the answer was correct, or `None` when there is
    /// nothing to lock (no answer yet, already locked, or not in
    /// progress).
    pub fn lock(&mut self) -> Option<bool> {
        if self.phase != Phase::InProgress || self.locked {
            return None;
        }
        let selected = self.answers[self.pointer]?;
        self.locked = true;
        let correct = self.current_question().is_correct(selected);
        tracing::debug!(question = self.pointer, correct, "answer locked");
        Some(correct)
    }

    /// Move to the next question. Requires the current one to be locked.
    ///
    /// Returns the new pointer; on the last question the pointer stays put.
    pub fn go_next(&mut self) -> Result<usize, QuizError> {
        self.ensure_in_progress()?;
        if !self.locked {
            return Err(QuizError::AnswerRequired);
        }
        if self.pointer + 1 < self.questions.len() {
            self.move_to(self.pointer + 1);
        }
        Ok(self.pointer)
    }

    /// Move to the previous question; clamped at the first one.
    pub fn go_previous(&mut self) -> Result<usize, QuizError> {
        self.ensure_in_progress()?;
        if self.pointer > 0 {
            self.move_to(self.pointer - 1);
        }
        Ok(self.pointer)
    }

    /// True iff every question has a recorded answer.
    pub fn can_finish(&self) -> bool {
        self.answers.iter().all(Option::is_some)
    }

    /// Finish the quiz on user request.
    ///
    /// Rejected with [`QuizError::Incomplete`] while questions remain
    /// unanswered. Once finished, further calls return the same outcome.
    pub fn finish(&mut self) -> Result<&QuizOutcome, QuizError> {
        if self.outcome.is_none() {
            if !self.can_finish() {
                return Err(QuizError::Incomplete {
                    answered: self.answered_count(),
                    total: self.questions.len(),
                });
            }
            self.complete(false);
        }
        self.outcome.as_ref().ok_or(QuizError::NotFinished)
    }

    /// Advance the countdown by one second.
    ///
    /// Reaching zero finishes the quiz even if it is incomplete. Ticks
    /// outside `InProgress` are ignored, so expiry happens exactly once.
    pub fn tick(&mut self) -> Tick {
        if self.phase != Phase::InProgress {
            return Tick::Idle;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            tracing::info!("countdown expired");
            self.complete(true);
            return Tick::Expired;
        }
        Tick::Running(self.remaining_secs)
    }

    /// Switch to the review of wrong answers.
    pub fn show_review(&mut self) -> Result<&[ReviewEntry], QuizError> {
        let Some(outcome) = self.outcome.as_ref() else {
            return Err(QuizError::NotFinished);
        };
        if outcome.review_entries.is_empty() {
            return Err(QuizError::NothingToReview);
        }
        self.phase = Phase::Reviewing;
        Ok(&outcome.review_entries)
    }

    /// Reset everything for a fresh attempt over the same questions.
    pub fn restart(&mut self) {
        self.pointer = 0;
        self.answers.iter_mut().for_each(|a| *a = None);
        self.locked = false;
        self.remaining_secs = self.config.time_limit_secs;
        self.started_at = self.clock.now();
        self.phase = Phase::InProgress;
        self.outcome = None;
        tracing::info!("quiz restarted");
    }

    fn move_to(&mut self, pointer: usize) {
        self.pointer = pointer;
        self.locked = self.answers[pointer].is_some();
        tracing::debug!(question = pointer, locked = self.locked, "moved");
    }

    fn complete(&mut self, timed_out: bool) {
        let elapsed = (self.clock.now() - self.started_at).num_seconds().max(0) as u64;
        let outcome = QuizOutcome::compute(&self.questions, &self.answers, elapsed, timed_out);
        tracing::info!(
            correct = outcome.correct_count,
            total = outcome.total_questions,
            percentage = outcome.percentage,
            timed_out,
            "quiz finished"
        );
        self.outcome = Some(outcome);
        self.phase = Phase::Finished;
    }

    fn ensure_in_progress(&self) -> Result<(), QuizError> {
        if self.phase == Phase::InProgress {
            Ok(())
        } else {
            Err(QuizError::NotInProgress)
        }
    }

    // -----------------------------------------------------------------
    // Read-only views
    // -----------------------------------------------------------------

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question(&self) -> &Question {
        &self.questions[self.pointer]
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn is_first_question(&self) -> bool {
        self.pointer == 0
    }

    pub fn is_last_question(&self) -> bool {
        self.pointer + 1 == self.questions.len()
    }

    /// All answer slots, one per question.
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    /// Recorded answer for the current question.
    pub fn selected(&self) -> Option<usize> {
        self.answers[self.pointer]
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn status(&self) -> QuestionStatus {
        match (self.selected(), self.locked) {
            (None, _) => QuestionStatus::ChooseAnswer,
            (Some(_), false) => QuestionStatus::Pending,
            (Some(s), true) if self.current_question().is_correct(s) => QuestionStatus::Correct,
            (Some(_), true) => QuestionStatus::Incorrect,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    /// Position-based progress, `round(100 * (pointer + 1) / total)`.
    pub fn progress_percent(&self) -> u32 {
        percentage(self.pointer + 1, self.questions.len())
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_low_time(&self) -> bool {
        self.remaining_secs <= LOW_TIME_SECS
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<&QuizOutcome> {
        self.outcome.as_ref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn config(&self) -> &QuizEngineConfig {
        &self.config
    }

    /// Mutable access to the clock, for advancing a fixed clock in tests.
    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }
}
