//! Async session driver.
//!
//! Owns the two timers the engine does not: the one-second countdown
//! interval and the reveal delay after an answer is selected. User input
//! arrives as [`QuizCommand`]s on a channel, and every visible change is
//! reported to a [`QuizObserver`] so the presentation layer can redraw.

use std::future::pending;

use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep_until, Duration, Instant, MissedTickBehavior};

use crate::engine::{Phase, QuizEngine, SelectOutcome, Tick};
use crate::error::QuizError;
use crate::scoring::{QuizOutcome, ReviewEntry};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// A user action forwarded to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCommand {
    Select(usize),
    Next,
    Previous,
    Finish,
    Review,
    Restart,
    Quit,
}

/// Render hooks called by [`run_session`].
pub trait QuizObserver {
    /// A question became current (start, navigation, restart).
    fn on_question(&self, engine: &QuizEngine);
    /// An answer was recorded and its reveal is scheduled.
    fn on_selected(&self, engine: &QuizEngine, option: usize);
    /// The current question was locked.
    fn on_locked(&self, engine: &QuizEngine, correct: bool);
    /// One second passed.
    fn on_tick(&self, remaining_secs: u64, low_time: bool);
    /// An operation was refused; the state is unchanged.
    fn on_rejected(&self, error: &QuizError);
    /// The attempt finished, by the user or by the countdown.
    fn on_finished(&self, outcome: &QuizOutcome);
    /// The review of wrong answers was opened.
    fn on_review(&self, entries: &[ReviewEntry]);
}

/// Drive `engine` until [`QuizCommand::Quit`] arrives or the channel closes.
///
/// Returns the outcome of every attempt finished during the session, in
/// order; a restart after finishing starts a new attempt.
pub async fn run_session(
    engine: &mut QuizEngine,
    commands: &mut mpsc::Receiver<QuizCommand>,
    observer: &dyn QuizObserver,
) -> Vec<QuizOutcome> {
    let reveal_delay = engine.config().reveal_delay;
    let mut ticker = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut reveal_at: Option<Instant> = None;
    let mut outcomes = Vec::new();

    observer.on_question(engine);

    loop {
        let deadline = reveal_at;
        let reveal = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => pending::<()>().await,
            }
        };
        let running = engine.phase() == Phase::InProgress;

        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                tracing::debug!(?command, "command received");
                match command {
                    QuizCommand::Quit => break,
                    QuizCommand::Select(option) => match engine.select_answer(option) {
                        Ok(SelectOutcome::Recorded(option)) => {
                            reveal_at.get_or_insert_with(|| Instant::now() + reveal_delay);
                            observer.on_selected(engine, option);
                        }
                        Ok(SelectOutcome::Ignored) => {}
                        Err(e) => observer.on_rejected(&e),
                    },
                    QuizCommand::Next | QuizCommand::Previous => {
                        let from = engine.pointer();
                        let moved = if command == QuizCommand::Next {
                            engine.go_next()
                        } else {
                            engine.go_previous()
                        };
                        match moved {
                            // a clamped move keeps any pending reveal
                            Ok(to) if to != from => {
                                reveal_at = None;
                                observer.on_question(engine);
                            }
                            Ok(_) => {}
                            Err(e) => observer.on_rejected(&e),
                        }
                    }
                    QuizCommand::Finish => {
                        finish(engine, observer, &mut outcomes);
                        if engine.phase() != Phase::InProgress {
                            reveal_at = None;
                        }
                    }
                    QuizCommand::Review => match engine.show_review() {
                        Ok(entries) => observer.on_review(entries),
                        Err(e) => observer.on_rejected(&e),
                    },
                    QuizCommand::Restart => {
                        engine.restart();
                        reveal_at = None;
                        ticker.reset();
                        observer.on_question(engine);
                    }
                }
            }
            _ = ticker.tick(), if running => {
                match engine.tick() {
                    Tick::Running(remaining) => observer.on_tick(remaining, engine.is_low_time()),
                    Tick::Expired => {
                        reveal_at = None;
                        observer.on_tick(0, true);
                        if let Some(outcome) = engine.outcome() {
                            observer.on_finished(outcome);
                            outcomes.push(outcome.clone());
                        }
                    }
                    Tick::Idle => {}
                }
            }
            _ = reveal => {
                reveal_at = None;
                if let Some(correct) = engine.lock() {
                    observer.on_locked(engine, correct);
                    let auto_finish = engine.config().auto_finish
                        && engine.is_last_question()
                        && engine.can_finish();
                    if auto_finish {
                        finish(engine, observer, &mut outcomes);
                    }
                }
            }
        }
    }

    outcomes
}

fn finish(engine: &mut QuizEngine, observer: &dyn QuizObserver, outcomes: &mut Vec<QuizOutcome>) {
    let already_finished = engine.phase() != Phase::InProgress;
    match engine.finish() {
        Ok(outcome) if !already_finished => {
            observer.on_finished(outcome);
            outcomes.push(outcome.clone());
        }
        Ok(_) => {}
        Err(e) => observer.on_rejected(&e),
    }
}
