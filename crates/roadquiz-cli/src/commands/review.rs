//! The `roadquiz review` command.

use std::path::PathBuf;

use anyhow::Result;
use roadquiz_core::report::QuizReport;
use roadquiz_report::html::write_html_report;
use roadquiz_report::text::{render_result, render_review};

use super::Context;

pub fn execute(ctx: &Context, report_path: PathBuf, html: Option<PathBuf>) -> Result<()> {
    let report = QuizReport::load_json(&report_path)?;

    println!(
        "{} | {} | {}",
        report.bank.name,
        report.user.as_deref().unwrap_or("guest"),
        report.created_at.format("%Y-%m-%d %H:%M")
    );
    println!();
    print!("{}", render_result(&report.outcome));

    if report.outcome.has_mistakes() {
        println!();
        print!("{}", render_review(&report.outcome.review_entries));
    } else {
        println!("\nNo mistakes to review.");
    }

    if let Some(path) = html {
        let theme = ctx.store()?.theme();
        write_html_report(&report, theme, &path)?;
        eprintln!("HTML report: {}", path.display());
    }

    Ok(())
}
