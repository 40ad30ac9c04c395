//! The `roadquiz history` command.

use anyhow::{Context as _, Result};
use comfy_table::{Cell, Table};
use roadquiz_profile::{ProfileError, ResultRecord};
use roadquiz_report::text::format_elapsed;

use super::Context;

pub fn execute(ctx: &Context, limit: Option<usize>) -> Result<()> {
    let store = ctx.store()?;
    let Some(user) = store.current_user() else {
        return Err(ProfileError::NotLoggedIn).context("run `roadquiz login` first");
    };

    let results = store.results();
    if results.is_empty() {
        println!("No saved results for {}.", user.username);
        return Ok(());
    }

    let shown = limit.unwrap_or(results.len()).min(results.len());
    println!("{}", results_table(&results[..shown]));
    if shown < results.len() {
        println!("({} of {} results shown)", shown, results.len());
    }
    Ok(())
}

fn results_table(results: &[ResultRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Test", "Score", "%", "Result", "Time"]);

    for r in results {
        let score = if r.timed_out {
            format!("{}/{} (time up)", r.score, r.total_questions)
        } else {
            format!("{}/{}", r.score, r.total_questions)
        };
        table.add_row(vec![
            Cell::new(r.date.format("%Y-%m-%d %H:%M")),
            Cell::new(&r.test_name),
            Cell::new(score),
            Cell::new(format!("{}%", r.percentage)),
            Cell::new(r.band),
            Cell::new(format_elapsed(r.elapsed_secs)),
        ]);
    }

    table
}
