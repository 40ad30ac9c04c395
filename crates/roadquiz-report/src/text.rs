//! Plain-text screens for a terminal front end.

use std::fmt::Write;

use roadquiz_core::engine::{QuestionStatus, QuizEngine};
use roadquiz_core::model::option_letter;
use roadquiz_core::scoring::{QuizOutcome, ReviewEntry};

/// Label shown for a review entry with no recorded answer.
pub const NOT_ANSWERED: &str = "Not answered";

/// Countdown format, `MM:SS`.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Time-spent format, `M:SS`.
pub fn format_elapsed(secs: u64) -> String {
    format!("{}:{:02}", secs / 60, secs % 60)
}

pub fn status_text(status: QuestionStatus) -> &'static str {
    match status {
        QuestionStatus::ChooseAnswer => "Choose an answer",
        QuestionStatus::Pending => "Checking...",
        QuestionStatus::Correct => "Correct!",
        QuestionStatus::Incorrect => "Wrong!",
    }
}

/// Timer line; flagged when little time is left.
pub fn render_timer(remaining_secs: u64, low_time: bool) -> String {
    if low_time {
        format!("Time left: {} (hurry up!)", format_clock(remaining_secs))
    } else {
        format!("Time left: {}", format_clock(remaining_secs))
    }
}

/// The current question with its options, marks, and status.
pub fn render_question(engine: &QuizEngine) -> String {
    let question = engine.current_question();
    let selected = engine.selected();
    let locked = engine.is_locked();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Question {} of {}  |  {}%  |  {}",
        engine.pointer() + 1,
        engine.question_count(),
        engine.progress_percent(),
        format_clock(engine.remaining_secs())
    );
    let _ = writeln!(out);
    let _ = writeln!(out, "{}. {}", question.id, question.prompt);
    if let Some(image) = &question.image {
        let _ = writeln!(out, "[image: {image}]");
    }
    let _ = writeln!(out);

    for (i, option) in question.options.iter().enumerate() {
        let mark = match (locked, selected == Some(i), question.is_correct(i)) {
            (true, _, true) => "+",
            (true, true, false) => "x",
            (false, true, _) => ">",
            _ => " ",
        };
        let _ = writeln!(out, " {mark} {}) {option}", option_letter(i));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", status_text(engine.status()));
    out
}

/// Result screen after the attempt finished.
pub fn render_result(outcome: &QuizOutcome) -> String {
    let mut out = String::new();
    if outcome.timed_out {
        let _ = writeln!(out, "Time is up!");
    }
    let _ = writeln!(
        out,
        "Score: {} / {} ({}%)",
        outcome.correct_count, outcome.total_questions, outcome.percentage
    );
    let _ = writeln!(out, "Correct: {}", outcome.correct_count);
    let _ = writeln!(out, "Wrong: {}", outcome.wrong_count());
    let _ = writeln!(out, "Time spent: {}", format_elapsed(outcome.elapsed_secs));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", outcome.band.message());
    out
}

/// Wrong and unanswered questions with both answers.
pub fn render_review(entries: &[ReviewEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}. {}", entry.question.id, entry.question.prompt);
        if let Some(image) = &entry.question.image {
            let _ = writeln!(out, "   [image: {image}]");
        }
        let _ = writeln!(
            out,
            "   Your answer:    {}",
            entry.selected_text().unwrap_or(NOT_ANSWERED)
        );
        let _ = writeln!(out, "   Correct answer: {}", entry.correct_text());
        let _ = writeln!(out);
    }
    out
}
