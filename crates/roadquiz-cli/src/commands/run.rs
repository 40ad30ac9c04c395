//! The `roadquiz run` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use roadquiz_core::clock::Clock;
use roadquiz_core::driver::{run_session, QuizCommand, QuizObserver};
use roadquiz_core::engine::QuizEngine;
use roadquiz_core::error::QuizError;
use roadquiz_core::model::option_letter;
use roadquiz_core::parser::parse_bank;
use roadquiz_core::report::QuizReport;
use roadquiz_core::scoring::{QuizOutcome, ReviewEntry};
use roadquiz_report::html::write_html_report;
use roadquiz_report::text::{render_question, render_result, render_review, render_timer};

use super::Context;

const HELP: &str = "Answer with a letter (a, b, c...) or number (1, 2, 3...). \
Commands: n = next, p = previous, f = finish, r = review, restart, q = quit";

/// Extra wait after a selection so piped input does not outrun the reveal.
const INPUT_PACE_MARGIN: Duration = Duration::from_millis(50);

/// Prints every engine event to the terminal.
struct ConsoleObserver;

impl QuizObserver for ConsoleObserver {
    fn on_question(&self, engine: &QuizEngine) {
        println!();
        print!("{}", render_question(engine));
    }

    fn on_selected(&self, _engine: &QuizEngine, option: usize) {
        println!("Selected {}.", option_letter(option));
    }

    fn on_locked(&self, engine: &QuizEngine, correct: bool) {
        let question = engine.current_question();
        if correct {
            println!("Correct!");
        } else {
            println!(
                "Wrong! Correct answer: {}) {}",
                option_letter(question.correct),
                question.correct_text()
            );
        }
    }

    fn on_tick(&self, remaining_secs: u64, low_time: bool) {
        let announce = if low_time {
            remaining_secs % 10 == 0
        } else {
            remaining_secs % 300 == 0
        };
        if announce {
            println!("{}", render_timer(remaining_secs, low_time));
        }
    }

    fn on_rejected(&self, error: &QuizError) {
        eprintln!("! {error}");
    }

    fn on_finished(&self, outcome: &QuizOutcome) {
        println!();
        print!("{}", render_result(outcome));
        println!();
        if outcome.has_mistakes() {
            println!("r = review mistakes, restart = try again, q = quit");
        } else {
            println!("restart = try again, q = quit");
        }
    }

    fn on_review(&self, entries: &[ReviewEntry]) {
        println!();
        print!("{}", render_review(entries));
    }
}

pub async fn execute(
    ctx: &Context,
    bank_path: Option<PathBuf>,
    time_limit: Option<u64>,
    auto_finish: bool,
    output: Option<PathBuf>,
    format: String,
) -> Result<()> {
    let formats: Vec<&str> = match format.as_str() {
        "all" => vec!["json", "html"],
        "none" => Vec::new(),
        other => other.split(',').map(str::trim).collect(),
    };
    if let Some(bad) = formats.iter().find(|f| !matches!(**f, "json" | "html")) {
        anyhow::bail!("unknown report format: '{bad}' (expected json, html, all, none)");
    }

    let config = ctx.config()?;
    let bank_path = bank_path
        .or_else(|| config.default_bank.clone())
        .context("no question bank given; pass --bank or set default_bank in roadquiz.toml")?;
    let mut bank = parse_bank(&bank_path)?;
    if time_limit.is_some() {
        bank.time_limit_secs = time_limit;
    }

    let mut engine_config = config.engine_config();
    engine_config.auto_finish |= auto_finish;
    let mut engine = QuizEngine::from_bank(&bank, engine_config, Clock::System)
        .with_context(|| format!("cannot start quiz from {}", bank_path.display()))?;

    let mut store = ctx.store()?;
    let user = store.current_user().map(|u| u.username.clone());

    println!(
        "{} | {} questions | {}",
        bank.name,
        bank.len(),
        user.as_deref().unwrap_or("guest")
    );
    println!("{HELP}");

    let (tx, mut rx) = mpsc::channel(16);
    let pace = engine.config().reveal_delay + INPUT_PACE_MARGIN;
    let input = spawn_input(tx, pace);

    let outcomes = run_session(&mut engine, &mut rx, &ConsoleObserver).await;
    drop(rx);
    if let Err(e) = input.await {
        tracing::warn!("input reader stopped abnormally: {e}");
    }

    let output = output.unwrap_or(config.results_dir);
    let theme = store.theme();
    for outcome in outcomes {
        let report = QuizReport::new(&bank, user.clone(), outcome);

        for fmt in &formats {
            let path = output.join(format!("{}.{fmt}", report.file_stem()));
            if *fmt == "json" {
                report.save_json(&path)?;
                eprintln!("Results saved to: {}", path.display());
            } else {
                write_html_report(&report, theme, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
        }

        if store.save_result(&report)? {
            tracing::debug!("result added to the history of {:?}", user);
        }
    }

    Ok(())
}

/// Forward stdin lines to the session as commands.
///
/// Stops reading after `quit` so the process can exit without waiting
/// for another line.
fn spawn_input(tx: mpsc::Sender<QuizCommand>, pace: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::warn!("failed to read input: {e}");
                    break;
                }
            };

            let Some(command) = parse_command(&line) else {
                if !line.trim().is_empty() {
                    eprintln!("{HELP}");
                }
                continue;
            };
            if tx.send(command).await.is_err() || command == QuizCommand::Quit {
                break;
            }
            if matches!(command, QuizCommand::Select(_)) {
                tokio::time::sleep(pace).await;
            }
        }
    })
}

/// Map one line of input to a command.
///
/// Command words win over option letters, so options `F`, `N`, `P`, `Q`
/// and `R` are only reachable by number.
fn parse_command(line: &str) -> Option<QuizCommand> {
    let input = line.trim().to_ascii_lowercase();
    let command = match input.as_str() {
        "n" | "next" => QuizCommand::Next,
        "p" | "prev" | "previous" => QuizCommand::Previous,
        "f" | "finish" => QuizCommand::Finish,
        "r" | "review" => QuizCommand::Review,
        "restart" => QuizCommand::Restart,
        "q" | "quit" | "exit" => QuizCommand::Quit,
        _ => {
            if let Ok(n) = input.parse::<usize>() {
                return n.checked_sub(1).map(QuizCommand::Select);
            }
            let mut chars = input.chars();
            match (chars.next(), chars.next()) {
                (Some(c @ 'a'..='z'), None) => QuizCommand::Select(c as usize - 'a' as usize),
                _ => return None,
            }
        }
    };
    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!(parse_command("n"), Some(QuizCommand::Next));
        assert_eq!(parse_command(" Previous "), Some(QuizCommand::Previous));
        assert_eq!(parse_command("F"), Some(QuizCommand::Finish));
        assert_eq!(parse_command("review"), Some(QuizCommand::Review));
        assert_eq!(parse_command("restart"), Some(QuizCommand::Restart));
        assert_eq!(parse_command("exit"), Some(QuizCommand::Quit));
    }

    #[test]
    fn parse_answers() {
        assert_eq!(parse_command("a"), Some(QuizCommand::Select(0)));
        assert_eq!(parse_command("C"), Some(QuizCommand::Select(2)));
        assert_eq!(parse_command("1"), Some(QuizCommand::Select(0)));
        assert_eq!(parse_command("6"), Some(QuizCommand::Select(5)));
        assert_eq!(parse_command("0"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("abc"), None);
        assert_eq!(parse_command("?"), None);
    }
}
