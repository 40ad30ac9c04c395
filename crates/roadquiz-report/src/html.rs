//! HTML result page generator.
//!
//! Produces a self-contained HTML file with all CSS inlined.

use std::f64::consts::PI;
use std::path::Path;

use anyhow::{Context, Result};
use roadquiz_core::report::QuizReport;
use roadquiz_profile::Theme;

use crate::text::{format_elapsed, NOT_ANSWERED};

const RING_RADIUS: f64 = 90.0;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate the result page for a finished attempt.
pub fn generate_html(report: &QuizReport, theme: Theme) -> String {
    let outcome = &report.outcome;
    let mut html = String::new();

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"en\" data-theme=\"{theme}\">\n<head>\n"
    ));
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<meta name=\"theme-color\" content=\"{}\">\n",
        theme.theme_color()
    ));
    html.push_str(&format!(
        "<title>roadquiz result: {}</title>\n",
        html_escape(&report.bank.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&report.bank.name)));
    let who = report
        .user
        .as_deref()
        .map(html_escape)
        .unwrap_or_else(|| "guest".to_string());
    html.push_str(&format!(
        "<p class=\"meta\">{} | {} questions | {}</p>\n",
        who,
        report.bank.question_count,
        report.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    html.push_str("</header>\n");

    // Summary
    html.push_str("<section class=\"summary\">\n");
    html.push_str(&progress_ring(outcome.percentage));
    html.push_str("<dl>\n");
    html.push_str(&format!(
        "<dt>Score</dt><dd>{} / {}</dd>\n",
        outcome.correct_count, outcome.total_questions
    ));
    html.push_str(&format!(
        "<dt>Correct</dt><dd class=\"correct\">{}</dd>\n",
        outcome.correct_count
    ));
    html.push_str(&format!(
        "<dt>Wrong</dt><dd class=\"wrong\">{}</dd>\n",
        outcome.wrong_count()
    ));
    html.push_str(&format!(
        "<dt>Time spent</dt><dd>{}</dd>\n",
        format_elapsed(outcome.elapsed_secs)
    ));
    html.push_str("</dl>\n");
    if outcome.timed_out {
        html.push_str("<p class=\"timeout\">Time is up!</p>\n");
    }
    html.push_str(&format!(
        "<p class=\"message band-{}\">{}</p>\n",
        outcome.band.to_string().replace(' ', "-"),
        html_escape(outcome.band.message())
    ));
    html.push_str("</section>\n");

    // Review
    html.push_str("<section class=\"review\">\n");
    html.push_str("<h2>Review</h2>\n");
    if outcome.review_entries.is_empty() {
        html.push_str("<p>No mistakes. Well done!</p>\n");
    }
    for entry in &outcome.review_entries {
        let q = &entry.question;
        html.push_str("<div class=\"review-item\">\n");
        html.push_str(&format!(
            "<div class=\"review-question\">{}. {}</div>\n",
            q.id,
            html_escape(&q.prompt)
        ));
        if let Some(image) = &q.image {
            html.push_str(&format!(
                "<img src=\"{}\" alt=\"Question {}\" class=\"review-image\">\n",
                html_escape(image),
                q.id
            ));
        }
        html.push_str(&format!(
            "<div class=\"review-answer wrong\"><span class=\"label\">Your answer:</span> {}</div>\n",
            html_escape(entry.selected_text().unwrap_or(NOT_ANSWERED))
        ));
        html.push_str(&format!(
            "<div class=\"review-answer correct\"><span class=\"label\">Correct answer:</span> {}</div>\n",
            html_escape(entry.correct_text())
        ));
        html.push_str("</div>\n");
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write the result page to a file.
pub fn write_html_report(report: &QuizReport, theme: Theme, path: &Path) -> Result<()> {
    let html = generate_html(report, theme);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

/// Circular progress indicator filled to `percentage`.
fn progress_ring(percentage: u32) -> String {
    let circumference = 2.0 * PI * RING_RADIUS;
    let offset = circumference - f64::from(percentage.min(100)) / 100.0 * circumference;
    let size = (RING_RADIUS * 2.0 + 20.0) as u32;
    let center = size / 2;

    let mut svg = format!(
        "<svg class=\"ring\" width=\"{size}\" height=\"{size}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );
    svg.push_str(&format!(
        "  <circle cx=\"{center}\" cy=\"{center}\" r=\"{RING_RADIUS}\" fill=\"none\" stroke=\"var(--border)\" stroke-width=\"12\"/>\n"
    ));
    svg.push_str(&format!(
        "  <circle class=\"ring-fill\" cx=\"{center}\" cy=\"{center}\" r=\"{RING_RADIUS}\" fill=\"none\" stroke=\"var(--accent)\" stroke-width=\"12\" stroke-linecap=\"round\" stroke-dasharray=\"{circumference:.2}\" stroke-dashoffset=\"{offset:.2}\" transform=\"rotate(-90 {center} {center})\"/>\n"
    ));
    svg.push_str(&format!(
        "  <text x=\"{center}\" y=\"{center}\" font-size=\"32\" fill=\"currentColor\" text-anchor=\"middle\" dominant-baseline=\"middle\">{percentage}%</text>\n"
    ));
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #ffffff; --fg: #1a1a1a; --border: #e5e7eb; --accent: #3b82f6; --correct: #10b981; --wrong: #ef4444; }
[data-theme="dark"] { --bg: #0f172a; --fg: #f9fafb; --border: #334155; --accent: #60a5fa; }
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.summary { display: flex; flex-wrap: wrap; align-items: center; gap: 2rem; }
dl { display: grid; grid-template-columns: auto auto; gap: 0.25rem 1rem; }
dt { font-weight: bold; }
.correct { color: var(--correct); }
.wrong { color: var(--wrong); }
.timeout { color: var(--wrong); font-weight: bold; }
.message { flex-basis: 100%; font-size: 1.1rem; }
.ring-fill { transition: stroke-dashoffset 1.5s ease; }
.review-item { border: 1px solid var(--border); border-radius: 8px; padding: 1rem; margin: 1rem 0; }
.review-question { font-weight: bold; margin-bottom: 0.5rem; }
.review-image { max-width: 320px; display: block; margin: 0.5rem 0; }
.review-answer .label { font-weight: bold; }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
"#;
